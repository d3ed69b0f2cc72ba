//! The bounds-checked operand stack, living in the stack region of a [`Memory`].
//!
//! The stack grows upwards from [`MemoryLayout::stack_start`] and **SP** always points one past
//! its top. Neither operation mutates anything when it fails.
//!
//! [`MemoryLayout::stack_start`]: crate::memory::MemoryLayout::stack_start

use crate::cpu::Cpu;
use crate::error::Fault;
use crate::memory::Memory;

/// The value [`Vm::pop_or_sentinel`](crate::Vm::pop_or_sentinel) returns when the stack is
/// empty.
///
/// It is only a placeholder and must not be confused with an actual stack value.
pub const UNDERFLOW_SENTINEL: u32 = 0;

/// Pushes `value` on top of the stack.
pub fn push(cpu: &mut Cpu, memory: &mut Memory, value: u32) -> Result<(), Fault> {
    if cpu.sp >= memory.layout().size() {
        return Err(Fault::StackOverflow);
    }

    let slot = memory.get_mut(cpu.sp).ok_or(Fault::StackOverflow)?;
    *slot = value;
    cpu.sp += 1;

    Ok(())
}

/// Pops the value on top of the stack.
pub fn pop(cpu: &mut Cpu, memory: &Memory) -> Result<u32, Fault> {
    if cpu.sp <= memory.layout().stack_start() {
        return Err(Fault::StackUnderflow);
    }

    let value = memory.get(cpu.sp - 1).ok_or(Fault::StackUnderflow)?;
    cpu.sp -= 1;

    Ok(value)
}

/// Returns the stack words currently in scope, bottom first.
pub fn live<'m>(cpu: &Cpu, memory: &'m Memory) -> &'m [u32] {
    let start = memory.layout().stack_start();
    memory.slice(start..cpu.sp.max(start)).unwrap_or_default()
}

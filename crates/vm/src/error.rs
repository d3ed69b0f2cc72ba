//! Defines the [`Fault`] and [`LayoutError`] types of the crate.

use thiserror::Error;

/// A terminal condition raised while executing a program.
///
/// Every fault stops the current run. None of them can be caught by the running program
/// because the instruction set has no way to express exception handling.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// The **Program Counter** advanced past the end of memory.
    #[error("program counter out of bounds: {pc}")]
    ProgramBounds {
        /// The offending value of the **Program Counter**.
        pc: usize,
    },
    /// A value was pushed while the stack region was already full.
    #[error("stack overflow")]
    StackOverflow,
    /// A value was popped while the stack region was empty.
    #[error("stack underflow")]
    StackUnderflow,
    /// A `DIV` instruction found a zero divisor on top of the stack.
    #[error("division by zero")]
    DivideByZero,
    /// The opcode field of an instruction does not name an implemented operation.
    ///
    /// This includes the reserved names (`LOAD`, `STORE`, `JMP`, ...) that the dispatcher does
    /// not implement.
    #[error("unknown opcode: {opcode}")]
    UnknownOpcode {
        /// The raw opcode byte of the faulting instruction.
        opcode: u8,
    },
}

/// An error returned when a [`MemoryLayout`](crate::memory::MemoryLayout) cannot be built from
/// the requested sizes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// The memory is larger than [`MAX_MEMORY_SIZE`](crate::memory::MAX_MEMORY_SIZE) words.
    #[error("memory of {memory_size} words exceeds the supported maximum")]
    MemoryTooLarge {
        /// The requested total memory size.
        memory_size: usize,
    },
    /// The stack region must hold at least one word.
    #[error("stack size must be non-zero")]
    EmptyStack,
    /// The stack region is larger than the whole memory.
    #[error("stack of {stack_size} words does not fit in {memory_size} words of memory")]
    StackTooLarge {
        /// The requested total memory size.
        memory_size: usize,
        /// The requested stack size.
        stack_size: usize,
    },
    /// The code region must hold at least one word.
    #[error("code region is empty (data region starts at word 0)")]
    EmptyCodeRegion,
    /// The data region starts inside the stack region.
    #[error("data region start {data_start} overlaps the stack region at {stack_start}")]
    DataOverlapsStack {
        /// The requested start of the data region.
        data_start: usize,
        /// The computed start of the stack region.
        stack_start: usize,
    },
}

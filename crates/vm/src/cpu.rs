//! Defines the [`Cpu`] type, responsible for describing the register file of the machine.
//!
//! More information in the documentation for [`Cpu`].

/// The register file of the virtual machine.
///
/// By itself, a [`Cpu`] is not enough to execute a program. In order to do anything useful, it
/// has to be connected to a [`Memory`](crate::memory::Memory).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cpu {
    /// The Program Counter, index of the next word to be fetched from memory.
    ///
    /// # Invariants
    ///
    /// While the machine is running, **PC** indexes a valid memory cell before each fetch or
    /// the fetch faults.
    pub pc: usize,
    /// The Stack Pointer, index one past the logical top of the stack.
    ///
    /// # Invariants
    ///
    /// **SP** always lies within `stack_start..=memory_size` of the associated
    /// [`MemoryLayout`](crate::memory::MemoryLayout).
    pub sp: usize,
    /// General purpose register. Not used by any implemented instruction.
    pub a: u32,
    /// General purpose register. Not used by any implemented instruction.
    pub b: u32,
    /// General purpose register. Not used by any implemented instruction.
    pub c: u32,
}

impl Cpu {
    /// Creates a [`Cpu`] with **PC** at `entry` and an empty stack starting at `stack_start`.
    #[inline]
    pub const fn new(entry: usize, stack_start: usize) -> Self {
        Self {
            pc: entry,
            sp: stack_start,
            a: 0,
            b: 0,
            c: 0,
        }
    }
}

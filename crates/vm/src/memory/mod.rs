//! Defines the [`Memory`] type, responsible for representing the memory of the virtual machine.
//!
//! # Regions
//!
//! Memory is a flat array of 32-bit words, split once at construction into three regions:
//!
//! - the **code** region, `[0, data_start)`, holding the loaded program;
//! - the **data** region, `[data_start, stack_start)`, reserved for future load/store
//!   instructions;
//! - the **stack** region, `[stack_start, size)`, backing the operand stack.
//!
//! Region boundaries are described by a [`MemoryLayout`] and never change for the lifetime of
//! a [`Memory`] instance.

mod layout;

use std::ops::Range;

pub use self::layout::*;

/// Represents the memory of the virtual machine.
///
/// More information on memory can be found in [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    /// The boundaries of the regions of this memory.
    layout: MemoryLayout,
    /// The memory cells. Always exactly `layout.size()` words long.
    cells: Box<[u32]>,
}

impl Memory {
    /// Creates a new zeroed [`Memory`] sized according to `layout`.
    pub fn new(layout: MemoryLayout) -> Self {
        Self {
            layout,
            cells: vec![0; layout.size()].into_boxed_slice(),
        }
    }

    /// Returns the layout of this memory.
    #[inline(always)]
    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// Returns the total number of words in this memory.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns whether this memory holds no words at all.
    ///
    /// A [`MemoryLayout`] always has non-empty code and stack regions, so this is never the case
    /// in practice.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the word at `addr`, if it is within bounds.
    #[inline(always)]
    pub fn get(&self, addr: usize) -> Option<u32> {
        self.cells.get(addr).copied()
    }

    /// Returns a mutable reference to the word at `addr`, if it is within bounds.
    #[inline(always)]
    pub fn get_mut(&mut self, addr: usize) -> Option<&mut u32> {
        self.cells.get_mut(addr)
    }

    /// Returns the words in `range`, or `None` if the range is not within bounds.
    #[inline]
    pub fn slice(&self, range: Range<usize>) -> Option<&[u32]> {
        self.cells.get(range)
    }

    /// Returns the words of a whole region.
    #[inline]
    pub fn region(&self, region: Region) -> &[u32] {
        &self.cells[self.layout.range(region)]
    }

    /// Copies `words` into the code region, starting at address zero.
    ///
    /// # Truncation
    ///
    /// The code region has a fixed capacity. Words past that capacity are silently dropped;
    /// this is not an error. The number of words actually stored is returned.
    pub fn load_code(&mut self, words: &[u32]) -> usize {
        let count = words.len().min(self.layout.code_size());
        self.cells[..count].copy_from_slice(&words[..count]);
        count
    }
}

//! Defines the [`MemoryLayout`] type.

use std::ops::Range;

use crate::error::LayoutError;
use crate::instr::OPERAND_MAX;

/// The default total size of memory, in words.
pub const DEFAULT_MEMORY_SIZE: usize = 1024;

/// The default size of the stack region, in words.
pub const DEFAULT_STACK_SIZE: usize = 256;

/// The default first word of the data region.
pub const DEFAULT_DATA_START: usize = 512;

/// The largest supported memory size, in words.
///
/// Every address then fits in the 24-bit operand field of an instruction.
pub const MAX_MEMORY_SIZE: usize = OPERAND_MAX as usize + 1;

/// One of the three regions of a [`Memory`](super::Memory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Holds the loaded program.
    Code,
    /// Reserved for load/store instructions.
    Data,
    /// Backs the operand stack.
    Stack,
}

/// The boundaries of the regions of a [`Memory`](super::Memory).
///
/// # Invariants
///
/// `0 < data_start <= stack_start < size`, so the code and stack regions are never empty. The
/// data region may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryLayout {
    size: usize,
    data_start: usize,
    stack_start: usize,
}

impl MemoryLayout {
    /// Creates a new [`MemoryLayout`], checking that the three regions fit together.
    pub const fn new(
        memory_size: usize,
        stack_size: usize,
        data_start: usize,
    ) -> Result<Self, LayoutError> {
        if memory_size > MAX_MEMORY_SIZE {
            return Err(LayoutError::MemoryTooLarge { memory_size });
        }

        if stack_size == 0 {
            return Err(LayoutError::EmptyStack);
        }

        if stack_size > memory_size {
            return Err(LayoutError::StackTooLarge {
                memory_size,
                stack_size,
            });
        }

        if data_start == 0 {
            return Err(LayoutError::EmptyCodeRegion);
        }

        let stack_start = memory_size - stack_size;

        if data_start > stack_start {
            return Err(LayoutError::DataOverlapsStack {
                data_start,
                stack_start,
            });
        }

        Ok(Self {
            size: memory_size,
            data_start,
            stack_start,
        })
    }

    /// Returns the total number of words of memory.
    #[inline(always)]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns the capacity of the code region, in words.
    #[inline(always)]
    pub const fn code_size(&self) -> usize {
        self.data_start
    }

    /// Returns the first word of the data region.
    #[inline(always)]
    pub const fn data_start(&self) -> usize {
        self.data_start
    }

    /// Returns the first word of the stack region.
    #[inline(always)]
    pub const fn stack_start(&self) -> usize {
        self.stack_start
    }

    /// Returns the capacity of the stack region, in words.
    #[inline(always)]
    pub const fn stack_size(&self) -> usize {
        self.size - self.stack_start
    }

    /// Returns the range of addresses covered by `region`.
    pub const fn range(&self, region: Region) -> Range<usize> {
        match region {
            Region::Code => 0..self.data_start,
            Region::Data => self.data_start..self.stack_start,
            Region::Stack => self.stack_start..self.size,
        }
    }
}

impl Default for MemoryLayout {
    #[inline(always)]
    fn default() -> Self {
        Self {
            size: DEFAULT_MEMORY_SIZE,
            data_start: DEFAULT_DATA_START,
            stack_start: DEFAULT_MEMORY_SIZE - DEFAULT_STACK_SIZE,
        }
    }
}

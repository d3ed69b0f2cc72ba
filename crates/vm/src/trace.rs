//! Defines the [`Trace`] trait, used to gather information about the execution of a program
//! within the virtual machine.

use crate::error::Fault;
use crate::instr::Instruction;

/// A collection of callbacks to be called during the execution of a program.
#[allow(unused_variables)]
pub trait Trace {
    /// Called after an instruction has been fetched from `pc`, before it is executed.
    fn instruction(&mut self, pc: usize, instr: Instruction) {}

    /// Called when a `PRINT` instruction emits `value`.
    fn output(&mut self, value: u32) {}

    /// Called once when the current run stops on `fault`.
    fn fault(&mut self, fault: &Fault) {}
}

/// An implementation of [`Trace`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;
impl Trace for NoopTrace {}

/// An implementation of [`Trace`] that logs every event at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl Trace for LogTrace {
    fn instruction(&mut self, pc: usize, instr: Instruction) {
        crate::info!("{pc:>5}: {instr}");
    }

    fn output(&mut self, value: u32) {
        crate::info!("       -> {value}");
    }

    fn fault(&mut self, fault: &Fault) {
        crate::warn!("       !! {fault}");
    }
}

impl<T: ?Sized + Trace> Trace for &mut T {
    #[inline]
    fn instruction(&mut self, pc: usize, instr: Instruction) {
        (**self).instruction(pc, instr);
    }

    #[inline]
    fn output(&mut self, value: u32) {
        (**self).output(value);
    }

    #[inline]
    fn fault(&mut self, fault: &Fault) {
        (**self).fault(fault);
    }
}

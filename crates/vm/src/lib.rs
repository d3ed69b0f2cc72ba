//! # Basalt
//!
//! A small stack-based bytecode virtual machine.
//!
//! A [`Vm`] owns a flat, word-addressable [`Memory`] split into code, data and stack regions,
//! and a [`Cpu`] holding its registers. Programs are sequences of pre-encoded 32-bit
//! [`Instruction`] words copied into the code region with [`Vm::load_program`] and executed
//! with [`Vm::run`].
//!
//! ```
//! use basalt_vm::instr::{Instruction, OpCode};
//! use basalt_vm::trace::NoopTrace;
//! use basalt_vm::{Exit, Vm};
//!
//! let program = [
//!     Instruction::new(OpCode::Push, 10),
//!     Instruction::new(OpCode::Push, 20),
//!     Instruction::from(OpCode::Add),
//!     Instruction::from(OpCode::Print),
//!     Instruction::from(OpCode::Halt),
//! ];
//!
//! let mut vm = Vm::new();
//! vm.load_program(&program.map(u32::from));
//!
//! let mut printed = Vec::new();
//! assert_eq!(vm.run_with(&mut printed, &mut NoopTrace), Exit::Halted);
//! assert_eq!(printed, [30]);
//! ```

#![forbid(unsafe_code)]

use std::fmt;

use num_traits::{CheckedDiv, WrappingAdd, WrappingMul, WrappingSub};

use cpu::Cpu;
use error::{Fault, LayoutError};
use instr::{Instruction, OpCode};
use memory::{Memory, MemoryLayout};
use output::Output;
use trace::{NoopTrace, Trace};

pub mod cpu;
pub mod error;
pub mod instr;
pub mod log;
pub mod memory;
pub mod output;
pub mod stack;
pub mod trace;

/// The maximum number of stack words included in a [`StateDump`].
pub const DUMP_WINDOW: usize = 10;

/// Why a run of the virtual machine stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exit {
    /// The program executed a `HALT` instruction.
    Halted,
    /// The program stopped on a fault.
    Faulted(Fault),
}

impl Exit {
    /// Returns the fault that stopped the run, if any.
    #[inline(always)]
    pub const fn fault(self) -> Option<Fault> {
        match self {
            Self::Halted => None,
            Self::Faulted(fault) => Some(fault),
        }
    }
}

/// The execution state of a [`Vm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// The machine has been constructed but never started.
    Idle,
    /// The machine is inside of its fetch-execute loop.
    Running,
    /// The machine stopped. Nothing is fetched until the next [`Vm::start`].
    Stopped(Exit),
}

/// What the execution loop should do after an instruction.
enum Flow {
    Continue,
    Halt,
}

/// Contains the full state of a virtual machine.
///
/// # Components
///
/// - [`Cpu`]: the register file (**PC**, **SP** and the general purpose registers).
///
/// - [`Memory`]: the words of the machine. The program, the data and the stack are all stored
///   here.
///
/// Each [`Vm`] exclusively owns both components. Independent instances can run on different
/// threads without any synchronization.
///
/// # Restarting
///
/// Every call to [`Vm::start`] (and therefore [`Vm::run`]) resets all registers: **PC** goes
/// back to the start of the code region, the stack is emptied and `A`, `B` and `C` are cleared.
/// Memory is left as-is, so the loaded program survives.
#[derive(Debug, Clone)]
pub struct Vm {
    /// The register file of the virtual machine.
    cpu: Cpu,
    /// The memory associated with the virtual machine.
    memory: Memory,
    /// Whether the machine is idle, running, or stopped.
    state: RunState,
}

impl Default for Vm {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    /// Creates a new [`Vm`] using the default [`MemoryLayout`].
    pub fn new() -> Self {
        Self::with_layout(MemoryLayout::default())
    }

    /// Creates a new [`Vm`] with the provided [`MemoryLayout`].
    pub fn with_layout(layout: MemoryLayout) -> Self {
        Self {
            cpu: Cpu::new(0, layout.stack_start()),
            memory: Memory::new(layout),
            state: RunState::Idle,
        }
    }

    /// Creates a new [`Vm`], validating the requested region sizes.
    ///
    /// See [`MemoryLayout::new`].
    pub fn with_sizes(
        memory_size: usize,
        stack_size: usize,
        data_start: usize,
    ) -> Result<Self, LayoutError> {
        MemoryLayout::new(memory_size, stack_size, data_start).map(Self::with_layout)
    }

    /// Returns the current state of the [`Cpu`].
    #[inline(always)]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Returns the current state of the [`Memory`].
    #[inline(always)]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns the region boundaries of the machine's memory.
    #[inline(always)]
    pub fn layout(&self) -> &MemoryLayout {
        self.memory.layout()
    }

    /// Returns the current [`RunState`] of the machine.
    #[inline(always)]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns whether the machine is inside of its fetch-execute loop.
    #[inline(always)]
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Copies `words` into the code region of memory, starting at address zero.
    ///
    /// Words that do not fit in the code region are silently dropped. Returns the number of
    /// words that were stored.
    pub fn load_program(&mut self, words: &[u32]) -> usize {
        let stored = self.memory.load_code(words);
        if stored < words.len() {
            crate::warn!(
                "program truncated: {} words given, code region holds {}",
                words.len(),
                stored,
            );
        }
        stored
    }

    /// Resets the registers and enters the running state.
    pub fn start(&mut self) {
        self.cpu = Cpu::new(0, self.layout().stack_start());
        self.state = RunState::Running;
    }

    /// Runs the loaded program from the start until it halts or faults, writing printed values
    /// to the standard output.
    pub fn run(&mut self) -> Exit {
        self.run_with(&mut output::Stdout, &mut NoopTrace)
    }

    /// Runs the loaded program from the start until it halts or faults.
    ///
    /// Values printed by the program are written to `out`. Faults never escape this function:
    /// they are reported through the returned [`Exit`].
    ///
    /// There is no bound on the number of executed instructions. A program that loops forever
    /// makes this function loop forever; use [`Vm::step`] to enforce a budget.
    pub fn run_with<O, T>(&mut self, out: &mut O, trace: &mut T) -> Exit
    where
        O: ?Sized + Output,
        T: ?Sized + Trace,
    {
        crate::info!("starting virtual machine");
        self.start();

        let exit = loop {
            match self.step(out, trace) {
                RunState::Running => continue,
                RunState::Stopped(exit) => break exit,
                RunState::Idle => break Exit::Halted,
            }
        };

        crate::info!("virtual machine stopped");
        exit
    }

    /// Advances the machine by a single fetch-execute cycle.
    ///
    /// This does nothing if the machine is not running. Returns the state of the machine after
    /// the cycle.
    pub fn step<O, T>(&mut self, out: &mut O, trace: &mut T) -> RunState
    where
        O: ?Sized + Output,
        T: ?Sized + Trace,
    {
        if self.state != RunState::Running {
            return self.state;
        }

        match cycle(&mut self.cpu, &mut self.memory, out, trace) {
            Ok(Flow::Continue) => (),
            Ok(Flow::Halt) => {
                crate::info!("program halted");
                self.state = RunState::Stopped(Exit::Halted);
            }
            Err(fault) => {
                trace.fault(&fault);
                self.stop_on(fault);
            }
        }

        self.state
    }

    /// Pushes `value` on top of the stack.
    ///
    /// On overflow, the stack is left untouched and the machine stops.
    pub fn push(&mut self, value: u32) -> Result<(), Fault> {
        stack::push(&mut self.cpu, &mut self.memory, value).inspect_err(|&f| self.stop_on(f))
    }

    /// Pops the value on top of the stack.
    ///
    /// On underflow, the machine stops.
    pub fn pop(&mut self) -> Result<u32, Fault> {
        stack::pop(&mut self.cpu, &self.memory).inspect_err(|&f| self.stop_on(f))
    }

    /// Like [`Vm::pop`], but returns [`UNDERFLOW_SENTINEL`](stack::UNDERFLOW_SENTINEL) on
    /// underflow.
    ///
    /// The sentinel is a placeholder. Check [`Vm::state`] before trusting the result.
    pub fn pop_or_sentinel(&mut self) -> u32 {
        self.pop().unwrap_or(stack::UNDERFLOW_SENTINEL)
    }

    /// Takes a snapshot of the registers and of the top of the stack.
    ///
    /// This never modifies the machine and can be called in any state.
    pub fn dump_state(&self) -> StateDump {
        let live = stack::live(&self.cpu, &self.memory);
        let window = live.len().saturating_sub(DUMP_WINDOW);

        StateDump {
            pc: self.cpu.pc,
            sp: self.cpu.sp,
            a: self.cpu.a,
            b: self.cpu.b,
            c: self.cpu.c,
            stack: live[window..].to_vec(),
        }
    }

    /// Stops the machine because of `fault`.
    fn stop_on(&mut self, fault: Fault) {
        crate::error!("{fault}");
        self.state = RunState::Stopped(Exit::Faulted(fault));
    }
}

/// A snapshot of the registers of a [`Vm`] and of the top of its stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDump {
    /// The **Program Counter**.
    pub pc: usize,
    /// The **Stack Pointer**.
    pub sp: usize,
    /// General purpose register `A`.
    pub a: u32,
    /// General purpose register `B`.
    pub b: u32,
    /// General purpose register `C`.
    pub c: u32,
    /// Up to [`DUMP_WINDOW`] words from the top of the stack, bottom first.
    pub stack: Vec<u32>,
}

impl fmt::Display for StateDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== VM State Dump ===")?;
        writeln!(f, "PC: {}", self.pc)?;
        writeln!(f, "SP: {}", self.sp)?;
        writeln!(f, "A: {}, B: {}, C: {}", self.a, self.b, self.c)?;
        write!(f, "Stack (top {DUMP_WINDOW}):")?;
        for word in &self.stack {
            write!(f, " {word}")?;
        }
        writeln!(f)
    }
}

/// Fetches the instruction referenced by the **Program Counter** and advances it.
#[inline]
fn fetch(cpu: &mut Cpu, memory: &Memory) -> Result<Instruction, Fault> {
    let word = memory
        .get(cpu.pc)
        .ok_or(Fault::ProgramBounds { pc: cpu.pc })?;
    cpu.pc += 1;
    Ok(Instruction(word))
}

/// Runs a full fetch-execute cycle.
fn cycle<O, T>(cpu: &mut Cpu, memory: &mut Memory, out: &mut O, trace: &mut T) -> Result<Flow, Fault>
where
    O: ?Sized + Output,
    T: ?Sized + Trace,
{
    let pc = cpu.pc;
    let instr = fetch(cpu, memory)?;
    trace.instruction(pc, instr);
    execute(cpu, memory, instr, out, trace)
}

/// Pops `b`, then `a`, and pushes `op(a, b)`.
///
/// When `op` fails, nothing is pushed.
#[inline]
fn binary<F>(cpu: &mut Cpu, memory: &mut Memory, op: F) -> Result<(), Fault>
where
    F: FnOnce(u32, u32) -> Result<u32, Fault>,
{
    let b = stack::pop(cpu, memory)?;
    let a = stack::pop(cpu, memory)?;
    stack::push(cpu, memory, op(a, b)?)
}

/// Executes a single decoded instruction.
///
/// Arithmetic wraps around on overflow, and division truncates towards zero.
fn execute<O, T>(
    cpu: &mut Cpu,
    memory: &mut Memory,
    instr: Instruction,
    out: &mut O,
    trace: &mut T,
) -> Result<Flow, Fault>
where
    O: ?Sized + Output,
    T: ?Sized + Trace,
{
    let op = instr.op_code().ok_or(Fault::UnknownOpcode {
        opcode: instr.opcode(),
    })?;

    match op {
        OpCode::Halt => return Ok(Flow::Halt),
        OpCode::Push => stack::push(cpu, memory, instr.operand())?,
        OpCode::Pop => {
            stack::pop(cpu, memory)?;
        }
        OpCode::Add => binary(cpu, memory, |a, b| Ok(WrappingAdd::wrapping_add(&a, &b)))?,
        OpCode::Sub => binary(cpu, memory, |a, b| Ok(WrappingSub::wrapping_sub(&a, &b)))?,
        OpCode::Mul => binary(cpu, memory, |a, b| Ok(WrappingMul::wrapping_mul(&a, &b)))?,
        OpCode::Div => binary(cpu, memory, |a, b| {
            CheckedDiv::checked_div(&a, &b).ok_or(Fault::DivideByZero)
        })?,
        OpCode::Print => {
            let value = stack::pop(cpu, memory)?;
            trace.output(value);
            out.print(value);
        }
        OpCode::Nop => (),
        OpCode::Load
        | OpCode::Store
        | OpCode::Mov
        | OpCode::Jmp
        | OpCode::Jz
        | OpCode::Jnz
        | OpCode::Call
        | OpCode::Ret
        | OpCode::Read => return Err(Fault::UnknownOpcode { opcode: op as u8 }),
    }

    Ok(Flow::Continue)
}

//! Basalt: runs pre-encoded programs on the basalt virtual machine.

use std::process::ExitCode;

use basalt_vm::instr::{Instruction, OpCode};
use basalt_vm::log::Level;
use basalt_vm::output::Stdout;
use basalt_vm::trace::{LogTrace, NoopTrace, Trace};
use basalt_vm::{Exit, RunState, Vm};

use clap::Parser;

use crate::args::ExecArgs;

mod args;

/// The program halted normally.
const EXIT_SUCCESS: u8 = 0;
/// The program faulted or ran out of steps.
const EXIT_FAULT: u8 = 1;
/// Invalid memory layout. `clap` exits with the same code on bad flags.
const EXIT_USAGE_ERROR: u8 = 2;

/// `(10 + 20) * 2`.
fn demo_program() -> Vec<u32> {
    [
        Instruction::new(OpCode::Push, 10),
        Instruction::new(OpCode::Push, 20),
        Instruction::from(OpCode::Add),
        Instruction::new(OpCode::Push, 2),
        Instruction::from(OpCode::Mul),
        Instruction::from(OpCode::Print),
        Instruction::from(OpCode::Halt),
    ]
    .into_iter()
    .map(u32::from)
    .collect()
}

/// Runs the loaded program, stopping after `max_steps` instructions if provided.
///
/// Returns `None` when the budget ran out before the program stopped.
fn drive<T: Trace>(vm: &mut Vm, trace: &mut T, max_steps: Option<u64>) -> Option<Exit> {
    let Some(max_steps) = max_steps else {
        return Some(vm.run_with(&mut Stdout, trace));
    };

    vm.start();
    for _ in 0..max_steps {
        if let RunState::Stopped(exit) = vm.step(&mut Stdout, trace) {
            return Some(exit);
        }
    }

    None
}

fn main() -> ExitCode {
    run(ExecArgs::parse())
}

fn run(args: ExecArgs) -> ExitCode {
    basalt_vm::log::set_color_mode(args.color.into());
    if args.quiet {
        basalt_vm::log::set_min_level(Level::Warn);
    }

    let mut vm = match Vm::with_sizes(args.memory_size, args.stack_size, args.data_start) {
        Ok(vm) => vm,
        Err(err) => {
            basalt_vm::error!("invalid memory layout: {err}");
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let program = if args.program.is_empty() {
        basalt_vm::info!("no program given, running the demo program");
        demo_program()
    } else {
        args.program
    };
    vm.load_program(&program);

    let exit = if args.trace {
        drive(&mut vm, &mut LogTrace, args.max_steps)
    } else {
        drive(&mut vm, &mut NoopTrace, args.max_steps)
    };

    print!("\n{}", vm.dump_state());

    match exit {
        Some(Exit::Halted) => ExitCode::from(EXIT_SUCCESS),
        Some(Exit::Faulted(_)) => ExitCode::from(EXIT_FAULT),
        None => {
            basalt_vm::warn!(
                "step budget of {} exhausted",
                args.max_steps.unwrap_or_default()
            );
            ExitCode::from(EXIT_FAULT)
        }
    }
}

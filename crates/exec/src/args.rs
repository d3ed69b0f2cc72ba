//! Command-line arguments of the `basalt` host.

use basalt_vm::log::ColorMode;
use basalt_vm::memory::{DEFAULT_DATA_START, DEFAULT_MEMORY_SIZE, DEFAULT_STACK_SIZE};
use clap::{Parser, ValueEnum};
use thiserror::Error;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "basalt",
    version,
    about = "Runs pre-encoded programs on the basalt virtual machine.",
    long_about = "Runs a program made of pre-encoded instruction words (decimal or 0x-prefixed \
                  hexadecimal). Without any word, a built-in demo program computing \
                  (10 + 20) * 2 is executed."
)]
pub struct ExecArgs {
    #[arg(long = "memory", value_name = "N", default_value_t = DEFAULT_MEMORY_SIZE)]
    /// Total memory size, in words
    pub memory_size: usize,
    #[arg(long = "stack", value_name = "N", default_value_t = DEFAULT_STACK_SIZE)]
    /// Stack region size, in words
    pub stack_size: usize,
    #[arg(long, value_name = "N", default_value_t = DEFAULT_DATA_START)]
    /// First word of the data region
    pub data_start: usize,
    #[arg(long, value_name = "N")]
    /// Stop after executing N instructions
    pub max_steps: Option<u64>,
    #[arg(long)]
    /// Log every executed instruction
    pub trace: bool,
    #[arg(short, long)]
    /// Only log warnings and errors
    pub quiet: bool,
    #[arg(long, value_enum, value_name = "WHEN", default_value_t = Color::Auto)]
    /// When to colour diagnostics
    pub color: Color,
    #[arg(value_name = "WORD", value_parser = parse_word)]
    /// Instruction words to load. The demo program runs when none is given
    pub program: Vec<u32>,
}

/// Values of `--color`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Colour when standard error is a terminal
    Auto,
    /// Always colour
    Always,
    /// Never colour
    Never,
}

impl From<Color> for ColorMode {
    fn from(color: Color) -> Self {
        match color {
            Color::Auto => ColorMode::Auto,
            Color::Always => ColorMode::Always,
            Color::Never => ColorMode::Never,
        }
    }
}

/// A positional argument that is not a 32-bit word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid instruction word: {0}")]
pub struct InvalidWord(String);

/// Parses an instruction word, either decimal or `0x`-prefixed hexadecimal.
///
/// Underscores may be used as digit separators.
pub fn parse_word(s: &str) -> Result<u32, InvalidWord> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|_| InvalidWord(s.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<ExecArgs, clap::Error> {
        ExecArgs::try_parse_from(std::iter::once("basalt").chain(args.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        ExecArgs::command().debug_assert();
    }

    #[test]
    fn no_arguments_runs_the_demo() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.memory_size, DEFAULT_MEMORY_SIZE);
        assert_eq!(args.stack_size, DEFAULT_STACK_SIZE);
        assert_eq!(args.data_start, DEFAULT_DATA_START);
        assert_eq!(args.max_steps, None);
        assert_eq!(args.color, Color::Auto);
        assert!(!args.trace);
        assert!(!args.quiet);
        assert!(args.program.is_empty());
    }

    #[test]
    fn sizes_and_flags() {
        let args = parse(&[
            "--memory",
            "64",
            "--stack",
            "16",
            "--data-start",
            "32",
            "--trace",
            "-q",
            "--color",
            "never",
        ])
        .unwrap();
        assert_eq!(args.memory_size, 64);
        assert_eq!(args.stack_size, 16);
        assert_eq!(args.data_start, 32);
        assert!(args.trace);
        assert!(args.quiet);
        assert_eq!(ColorMode::from(args.color), ColorMode::Never);
    }

    #[test]
    fn words_in_both_bases() {
        let args = parse(&["0xA01", "2561", "0x0000_0003", "--max-steps", "5", "--", "0"]).unwrap();
        assert_eq!(args.program, [0xA01, 2561, 3, 0]);
        assert_eq!(args.max_steps, Some(5));
    }

    #[test]
    fn word_parser() {
        assert_eq!(parse_word("0XfF"), Ok(255));
        assert_eq!(parse_word("4_294_967_295"), Ok(u32::MAX));
        assert_eq!(
            parse_word("0x1_0000_0000"),
            Err(InvalidWord("0x1_0000_0000".into()))
        );
        assert_eq!(parse_word("ten"), Err(InvalidWord("ten".into())));
    }

    #[test]
    fn errors() {
        let kind = |args: &[&str]| parse(args).unwrap_err().kind();

        assert_eq!(kind(&["--stack"]), ErrorKind::InvalidValue);
        assert_eq!(kind(&["--memory", "lots"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["--nope"]), ErrorKind::UnknownArgument);
        assert_eq!(kind(&["0x1_0000_0000"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["--color", "sometimes"]), ErrorKind::InvalidValue);
        assert_eq!(kind(&["--help"]), ErrorKind::DisplayHelp);
        assert_eq!(kind(&["-V"]), ErrorKind::DisplayVersion);
    }
}

//! Defines the [`Output`] trait, the sink `PRINT` instructions write to.

use std::io::{self, Write};

/// A sink receiving the values printed by a running program.
///
/// Writing to a sink never suspends the machine. Implementations are free to buffer.
pub trait Output {
    /// Emits a single printed value.
    fn print(&mut self, value: u32);
}

/// Collects printed values in order.
impl Output for Vec<u32> {
    #[inline]
    fn print(&mut self, value: u32) {
        self.push(value);
    }
}

impl<O: ?Sized + Output> Output for &mut O {
    #[inline]
    fn print(&mut self, value: u32) {
        (**self).print(value);
    }
}

/// Writes every printed value as an `Output: <value>` line to the standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Output for Stdout {
    fn print(&mut self, value: u32) {
        let _ = writeln!(io::stdout().lock(), "Output: {value}");
    }
}

/// Writes every printed value as an `Output: <value>` line to an arbitrary writer.
///
/// Write errors are ignored: the machine has no way to report them to the running program.
#[derive(Debug, Default)]
pub struct Lines<W>(pub W);

impl<W: Write> Output for Lines<W> {
    fn print(&mut self, value: u32) {
        let _ = writeln!(self.0, "Output: {value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_format() {
        let mut out = Lines(Vec::<u8>::new());
        out.print(60);
        out.print(0);
        assert_eq!(String::from_utf8(out.0).unwrap(), "Output: 60\nOutput: 0\n");
    }
}

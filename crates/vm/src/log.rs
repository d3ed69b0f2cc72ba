//! Leveled diagnostics on the standard error stream.
//!
//! Records are written through the [`info!`](crate::info), [`warn!`](crate::warn) and
//! [`error!`](crate::error) macros, one line each, as `basalt: <level>: <message>`. The macros
//! expand to nothing observable in test builds of the calling crate.
//!
//! Two process-wide settings control the output: the least severe [`Level`] that is still
//! written ([`set_min_level`]) and whether the level tag is coloured ([`set_color_mode`]).

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Severity of a log record.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Progress information.
    Info = 1,
    /// Something went wrong in the executed program.
    Warn = 2,
    /// A run stopped on a fault.
    Error = 3,
}

impl Level {
    /// The colour of the level tag, if any.
    fn color(self) -> Option<Color> {
        match self {
            Level::Info => None,
            Level::Warn => Some(Color::Yellow),
            Level::Error => Some(Color::Red),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Level::Info => "info",
            Level::Warn => "warning",
            Level::Error => "error",
        })
    }
}

/// When to colour the level tag of a record.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Colour only when standard error looks like a terminal.
    #[default]
    Auto = 0,
    /// Always emit colour escapes.
    Always = 1,
    /// Never emit colour escapes.
    Never = 2,
}

impl ColorMode {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ColorMode::Always,
            2 => ColorMode::Never,
            _ => ColorMode::Auto,
        }
    }

    fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
static COLOR_MODE: AtomicU8 = AtomicU8::new(ColorMode::Auto as u8);

/// Discards every record less severe than `level`.
pub fn set_min_level(level: Level) {
    MIN_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Returns whether a record at `level` would currently be written.
pub fn enabled(level: Level) -> bool {
    level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
}

/// Sets when records written to standard error are coloured.
pub fn set_color_mode(mode: ColorMode) {
    COLOR_MODE.store(mode as u8, Ordering::Relaxed);
}

/// Returns the current [`ColorMode`].
pub fn color_mode() -> ColorMode {
    ColorMode::from_u8(COLOR_MODE.load(Ordering::Relaxed))
}

/// Writes one record to `out`. Only the level tag is coloured.
pub fn write_record<W: WriteColor>(
    out: &mut W,
    level: Level,
    message: fmt::Arguments<'_>,
) -> io::Result<()> {
    write!(out, "basalt: ")?;

    if let Some(color) = level.color() {
        out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(out, "{level}")?;
        out.reset()?;
    } else {
        write!(out, "{level}")?;
    }

    writeln!(out, ": {message}")
}

/// Internal logging function. Use the `info!`, `warn!`, or `error!` macros instead.
#[doc(hidden)]
pub fn log(level: Level, message: fmt::Arguments<'_>) {
    if !enabled(level) {
        return;
    }

    let stderr = StandardStream::stderr(color_mode().choice());
    let mut lock = stderr.lock();
    // Nowhere left to report a failing stderr.
    let _ = write_record(&mut lock, level, message);
}

/// Logs an info-level message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::log::log($crate::log::Level::Info, format_args!($($arg)*));
        }
    }};
}

/// Logs a warning-level message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::log::log($crate::log::Level::Warn, format_args!($($arg)*));
        }
    }};
}

/// Logs an error-level message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::log::log($crate::log::Level::Error, format_args!($($arg)*));
        }
    }};
}

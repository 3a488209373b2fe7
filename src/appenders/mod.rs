//! Appender implementations
//!
//! Appenders are the terminal [`Logger`](crate::Logger)s of a chain: they
//! encode an event and deliver it. Failures surface as the `log` call's error
//! and are never retried.

pub mod capture;
#[cfg(feature = "console")]
pub mod console;
pub mod json;
pub mod logfmt;

pub use capture::CaptureAppender;
#[cfg(feature = "console")]
pub use console::ConsoleAppender;
pub use json::JsonAppender;
pub use logfmt::LogfmtAppender;

use crate::core::{LoggerError, Result};
use std::io::Write;

/// Write `line` plus a newline in a single `write_all`.
pub(crate) fn write_line<W>(writer: &W, mut line: String, operation: &str) -> Result<()>
where
    for<'a> &'a W: Write,
{
    line.push('\n');
    let mut writer = writer;
    writer
        .write_all(line.as_bytes())
        .map_err(|e| LoggerError::io_operation(operation, e.to_string(), e))
}

//! Console appender implementation

use crate::core::level;
use crate::core::output_format::{text_body, OutputFormat};
use crate::core::{Level, Logger, LoggerError, Result, Value};
use colored::Colorize;
use std::io::{self, Write};

/// Writes events to the terminal.
///
/// Events tagged `error` or more severe go to stderr, everything else to
/// stdout. In text format the level is colored.
#[derive(Debug, Clone)]
pub struct ConsoleAppender {
    use_colors: bool,
    output_format: OutputFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            output_format: OutputFormat::Text,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use kvlog_facade::appenders::ConsoleAppender;
    /// use kvlog_facade::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Format as text with optional colors
    fn format_text(&self, level: Option<Level>, keyvals: &[Value]) -> String {
        let level_str = match level {
            Some(level) if self.use_colors => format!("{:5}", level.to_str().to_uppercase())
                .color(level.color_code())
                .to_string(),
            Some(level) => format!("{:5}", level.to_str().to_uppercase()),
            None => format!("{:5}", ""),
        };
        format!("[{}] {}", level_str, text_body(keyvals))
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for ConsoleAppender {
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        let level = level::find(keyvals);
        let output = match self.output_format {
            OutputFormat::Text => self.format_text(level, keyvals),
            format => format.encode(keyvals)?,
        };

        // Route Error and above to stderr, others to stdout
        let written = match level {
            Some(l) if l >= Level::Error => writeln!(io::stderr().lock(), "{}", output),
            _ => writeln!(io::stdout().lock(), "{}", output),
        };
        written.map_err(|e| LoggerError::io_operation("writing console event", e.to_string(), e))
    }

    fn flush(&self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }
}

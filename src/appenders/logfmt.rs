//! Logfmt appender

use super::write_line;
use crate::core::output_format::format_logfmt;
use crate::core::{Logger, Result, Value};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Writes each event as one `key=value ...` line.
#[derive(Debug)]
pub struct LogfmtAppender<W> {
    writer: W,
}

impl<W> LogfmtAppender<W>
where
    for<'a> &'a W: Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl LogfmtAppender<File> {
    /// Append to the file at `path`, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W> Logger for LogfmtAppender<W>
where
    W: Send + Sync,
    for<'a> &'a W: Write,
{
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        write_line(&self.writer, format_logfmt(keyvals), "writing logfmt event")
    }

    fn flush(&self) -> Result<()> {
        (&self.writer).flush()?;
        Ok(())
    }
}

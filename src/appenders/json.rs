//! JSON appender for structured logging

use super::write_line;
use crate::core::output_format::format_json;
use crate::core::{Logger, Result, Value};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Writes each event as a single-line JSON object (JSONL format)
///
/// Compatible with log aggregation tools like ELK, Loki, etc. The writer is
/// used through a shared reference, so `File`, `Stderr` and
/// [`SyncWriter`](crate::SyncWriter) all work without extra locking here.
#[derive(Debug)]
pub struct JsonAppender<W> {
    writer: W,
}

impl<W> JsonAppender<W>
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

impl JsonAppender<File> {
    /// Append to the file at `path`, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W> Logger for JsonAppender<W>
where
    W: Send + Sync,
    for<'a> &'a W: Write,
{
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        let json = format_json(keyvals)?;
        write_line(&self.writer, json, "writing JSON event")
    }

    fn flush(&self) -> Result<()> {
        (&self.writer).flush()?;
        Ok(())
    }
}

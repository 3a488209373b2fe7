//! Serialized access to loggers and writers

use super::error::Result;
use super::log_level::Level;
use super::logger::Logger;
use super::value::Value;
use parking_lot::{Mutex, MutexGuard};
use std::io::{self, Write};

/// Serializes every `log` call on the wrapped logger.
///
/// Use it in front of a sink that is not safe to enter concurrently, or whose
/// writes would interleave. No ordering is promised between callers.
#[derive(Debug, Default)]
pub struct SyncLogger<L> {
    inner: Mutex<L>,
}

impl<L: Logger> SyncLogger<L> {
    pub fn new(logger: L) -> Self {
        Self {
            inner: Mutex::new(logger),
        }
    }

    pub fn into_inner(self) -> L {
        self.inner.into_inner()
    }
}

impl<L: Logger> Logger for SyncLogger<L> {
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        self.inner.lock().log(keyvals)
    }

    fn flush(&self) -> Result<()> {
        self.inner.lock().flush()
    }

    fn enabled(&self, level: Level) -> bool {
        self.inner.lock().enabled(level)
    }
}

/// A writer that holds a lock for the duration of each write.
///
/// `&SyncWriter<W>` is itself a writer, so it can be shared between appenders
/// and threads. File-descriptor access is forwarded only when `W` has one.
#[derive(Debug, Default)]
pub struct SyncWriter<W> {
    inner: Mutex<W>,
}

impl<W: Write> SyncWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Hold the lock across several writes
    pub fn lock(&self) -> MutexGuard<'_, W> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write> Write for &SyncWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

impl<W: Write> Write for SyncWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.get_mut().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.get_mut().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.get_mut().flush()
    }
}

#[cfg(unix)]
impl<W: std::os::unix::io::AsRawFd> std::os::unix::io::AsRawFd for SyncWriter<W> {
    fn as_raw_fd(&self) -> std::os::unix::io::RawFd {
        self.inner.lock().as_raw_fd()
    }
}

#[cfg(windows)]
impl<W: std::os::windows::io::AsRawHandle> std::os::windows::io::AsRawHandle for SyncWriter<W> {
    fn as_raw_handle(&self) -> std::os::windows::io::RawHandle {
        self.inner.lock().as_raw_handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::CaptureAppender;
    use crate::keyvals;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sync_logger_forwards_enabled() {
        let filter = crate::core::level::new_filter(
            crate::core::logger::NopLogger,
            [crate::FilterOption::AllowError],
        );
        let logger = SyncLogger::new(filter);
        assert!(!logger.enabled(Level::Warn));
        assert!(logger.enabled(Level::Fatal));
    }

    #[test]
    fn test_sync_logger_forwards() {
        let capture = Arc::new(CaptureAppender::new());
        let logger = SyncLogger::new(capture.clone());
        logger.log(&keyvals!["a", 1]).unwrap();
        assert_eq!(capture.events(), vec![keyvals!["a", 1]]);
    }

    #[test]
    fn test_sync_writer_whole_writes() {
        let writer = Arc::new(SyncWriter::new(Vec::new()));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let writer = Arc::clone(&writer);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let line = format!("thread={} payload=abcdefghij\n", i);
                        (&*writer).write_all(line.as_bytes()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let writer = Arc::try_unwrap(writer).unwrap();
        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 200);
        assert!(lines
            .iter()
            .all(|l| l.starts_with("thread=") && l.ends_with("payload=abcdefghij")));
    }

    #[cfg(unix)]
    #[test]
    fn test_fd_forwarded_for_files() {
        use std::os::unix::io::AsRawFd;

        let file = tempfile::tempfile().unwrap();
        let fd = file.as_raw_fd();
        let writer = SyncWriter::new(file);
        assert_eq!(writer.as_raw_fd(), fd);
    }
}

//! Hot-swappable logger

use super::error::Result;
use super::log_level::Level;
use super::logger::Logger;
use super::value::Value;
use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;

/// A logger whose backend can be replaced while other threads are logging.
///
/// Reads go through a lock-free atomic load. A default-constructed
/// `SwapLogger` has no backend and accepts every event without forwarding it.
///
/// # Example
///
/// ```
/// use kvlog_facade::{keyvals, CaptureAppender, Logger, SwapLogger};
/// use std::sync::Arc;
///
/// let swap = SwapLogger::default();
/// swap.log(&keyvals!["dropped", true]).unwrap();
///
/// let capture = Arc::new(CaptureAppender::new());
/// swap.swap_arc(capture.clone());
/// swap.log(&keyvals!["kept", true]).unwrap();
/// assert_eq!(capture.len(), 1);
/// ```
#[derive(Default)]
pub struct SwapLogger {
    logger: ArcSwapOption<Box<dyn Logger>>,
}

impl SwapLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap logger with `logger` already installed
    pub fn with_logger<L: Logger + 'static>(logger: L) -> Self {
        let swap = Self::new();
        swap.swap(logger);
        swap
    }

    /// Install `logger`, replacing whatever was there.
    ///
    /// Calls that loaded the previous backend finish against it; calls that
    /// start after this returns see only `logger`.
    pub fn swap<L: Logger + 'static>(&self, logger: L) {
        self.logger.store(Some(Arc::new(Box::new(logger))));
    }

    /// Install a shared logger
    pub fn swap_arc(&self, logger: Arc<dyn Logger>) {
        self.swap(logger);
    }

    /// Remove the backend, returning to the no-op state
    pub fn clear(&self) {
        self.logger.store(None);
    }

    pub fn is_installed(&self) -> bool {
        self.logger.load().is_some()
    }
}

impl Logger for SwapLogger {
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        match &*self.logger.load() {
            Some(logger) => logger.log(keyvals),
            None => Ok(()),
        }
    }

    fn flush(&self) -> Result<()> {
        match &*self.logger.load() {
            Some(logger) => logger.flush(),
            None => Ok(()),
        }
    }

    fn enabled(&self, level: Level) -> bool {
        match &*self.logger.load() {
            Some(logger) => logger.enabled(level),
            None => false,
        }
    }
}

impl fmt::Debug for SwapLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapLogger")
            .field("installed", &self.is_installed())
            .finish()
    }
}

//! Process-wide default logger
//!
//! Library code should take a [`Logger`] parameter; this handle exists for
//! binaries that want one logger reachable from everywhere. It is installed
//! once with [`init`] and torn down with [`shutdown`].
//!
//! ```
//! use kvlog_facade::{global, keyvals, NopLogger};
//!
//! global::init(NopLogger).unwrap();
//! global::log(&keyvals!["msg", "started"]).unwrap();
//! global::shutdown();
//! ```

use super::error::{LoggerError, Result};
use super::logger::Logger;
use super::swap::SwapLogger;
use super::value::Value;
use once_cell::sync::{Lazy, OnceCell};

static DEFAULT_LOGGER: Lazy<SwapLogger> = Lazy::new(SwapLogger::new);
static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install the process-wide logger.
///
/// Succeeds once per process; later calls return
/// [`LoggerError::AlreadyInitialized`], even after [`shutdown`]. Use
/// [`logger`] and [`SwapLogger::swap`] to replace the backend afterwards.
pub fn init<L: Logger + 'static>(logger: L) -> Result<()> {
    INITIALIZED
        .set(())
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    DEFAULT_LOGGER.swap(logger);
    Ok(())
}

/// True once [`init`] has succeeded
pub fn is_initialized() -> bool {
    INITIALIZED.get().is_some()
}

/// The process-wide handle. Logging through it before [`init`] is a no-op.
pub fn logger() -> &'static SwapLogger {
    &DEFAULT_LOGGER
}

/// Log one event through the process-wide logger
pub fn log(keyvals: &[Value]) -> Result<()> {
    DEFAULT_LOGGER.log(keyvals)
}

pub fn flush() -> Result<()> {
    DEFAULT_LOGGER.flush()
}

/// Flush, then uninstall the process-wide backend.
///
/// A flush failure is reported on stderr; the backend is removed regardless.
pub fn shutdown() {
    if let Err(e) = DEFAULT_LOGGER.flush() {
        eprintln!("[LOGGER ERROR] Failed to flush default logger on shutdown: {}", e);
    }
    DEFAULT_LOGGER.clear();
}

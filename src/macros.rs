//! Macros for building events and logging formatted messages.
//!
//! `keyvals!` and `args!` build the argument lists the rest of the crate
//! takes. The leveled macros format a message with `format!` syntax and emit
//! `[level::key(), level, "msg", message]`, recording the call site for
//! `caller` valuers.
//!
//! # Examples
//!
//! ```
//! use kvlog_facade::{info, keyvals, level, CaptureAppender, Logger};
//!
//! let capture = CaptureAppender::new();
//!
//! // Basic logging
//! info!(capture, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(capture, "Server listening on port {}", port).unwrap();
//!
//! // Raw key/value events
//! capture.log(&keyvals![level::key(), kvlog_facade::Level::Debug, "port", port]).unwrap();
//! assert_eq!(capture.len(), 3);
//! ```

use crate::core::callsite;
use crate::core::level;
use crate::core::sugared::MESSAGE_KEY;
use crate::core::{Level, Logger, Result, Value};

/// Build a `Vec<Value>` of interleaved keys and values.
///
/// # Examples
///
/// ```
/// use kvlog_facade::{keyvals, Value};
///
/// let kv = keyvals!["user", "alice", "attempt", 3];
/// assert_eq!(kv[3], Value::I64(3));
/// ```
#[macro_export]
macro_rules! keyvals {
    ($($e:expr),* $(,)?) => {{
        let keyvals: ::std::vec::Vec<$crate::Value> = ::std::vec![$($crate::Value::from($e)),*];
        keyvals
    }};
}

/// Build a `Vec<Arg>` for sweetening: typed fields and loose values mixed.
///
/// # Examples
///
/// ```
/// use kvlog_facade::{args, Field};
///
/// let args = args![Field::new("typed", true), "loose", 1];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    ($($e:expr),* $(,)?) => {{
        let args: ::std::vec::Vec<$crate::Arg> = ::std::vec![$($crate::Arg::from($e)),*];
        args
    }};
}

/// Log a formatted message at the given level.
///
/// Evaluates to the logger's `Result`.
///
/// # Examples
///
/// ```
/// # use kvlog_facade::{CaptureAppender, Level};
/// # let logger = CaptureAppender::new();
/// use kvlog_facade::log;
/// log!(logger, Level::Info, "Simple message").unwrap();
/// log!(logger, Level::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::macros::log_message(&$logger, $level, ::std::format!($($arg)+))
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # let logger = kvlog_facade::CaptureAppender::new();
/// use kvlog_facade::trace;
/// trace!(logger, "Entering function: calculate()").unwrap();
/// trace!(logger, "Variable value: {}", 42).unwrap();
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # let logger = kvlog_facade::CaptureAppender::new();
/// use kvlog_facade::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error").unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message. Unlike `SugaredLogger::fatal`, this does not exit.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

#[doc(hidden)]
#[track_caller]
pub fn log_message<L: Logger + ?Sized>(logger: &L, level: Level, message: String) -> Result<()> {
    let _site = callsite::enter();
    logger.log(&[
        level::key(),
        level::value(level),
        Value::from(MESSAGE_KEY),
        Value::Str(message),
    ])
}

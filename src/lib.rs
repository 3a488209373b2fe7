//! # kvlog_facade
//!
//! A structured, leveled logging facade. Application code emits events as
//! interleaved key/value pairs through the [`Logger`] trait; decorators add
//! context, inject and filter levels, and hand the result to an appender.
//!
//! ## Features
//!
//! - **Composable**: every stage is a `Logger` wrapping another `Logger`
//! - **Leveled**: unspoofable level markers, injection of a default level,
//!   and severity filtering with optional squelch errors
//! - **Dynamic values**: [`Valuer`]s for timestamps and call sites,
//!   evaluated once per event
//! - **Thread Safe**: lock-free hot-swapping ([`SwapLogger`]) and serialized
//!   sinks ([`SyncLogger`], [`SyncWriter`])
//! - **Easy to Use**: a sugared API with printf-style and loosely-typed
//!   structured methods
//!
//! ## Example
//!
//! ```
//! use kvlog_facade::prelude::*;
//! use kvlog_facade::{args, level, keyvals};
//! use std::sync::Arc;
//!
//! let capture = Arc::new(CaptureAppender::new());
//! let logger = LoggerBuilder::new()
//!     .allow(Level::Info)
//!     .timestamp(None)
//!     .build_with(capture.clone());
//!
//! let pool = logger.with(keyvals!["rname", "testPool1"]);
//! level::info(pool.clone()).log(&keyvals!["attempt", 3, "backoff", "1s"]).unwrap();
//!
//! let sugar = SugaredLogger::from_context(pool);
//! sugar.debugw("not shown", args!["attempt", 4]);
//! assert_eq!(capture.len(), 1);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub use crate::core::{global, level};

pub mod prelude {
    pub use crate::appenders::{CaptureAppender, JsonAppender, LogfmtAppender};
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    pub use crate::core::{
        Arg, Context, Field, FilterOption, Level, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        OutputFormat, Result, SugaredLogger, SwapLogger, SweetenMode, SyncLogger, SyncWriter,
        TimestampFormat, Value, Valuer,
    };
}

pub use appenders::{CaptureAppender, JsonAppender, LogfmtAppender};
#[cfg(feature = "console")]
pub use appenders::ConsoleAppender;
pub use crate::core::{
    sweeten, Arg, CallSite, CollectingDiagnostics, Context, DiagnosticSink, EventMetrics, Field,
    FilterOption, InvalidPair, Level, LevelFilter, LevelInjector, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerFn, MalformedEventError, NopLogger, OutputFormat,
    PanicDiagnostics, ProcessDiagnostics, Result, SquelchError, StderrDiagnostics, SugaredLogger,
    SugaredLoggerBuilder, SwapLogger, SweetenMode, SyncLogger, SyncWriter, TimestampFormat, Value,
    Valuer,
};

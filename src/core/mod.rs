//! Core event model, decorators and wrappers

pub mod builder;
pub mod callsite;
pub mod diagnostic;
pub mod error;
pub mod global;
pub mod level;
pub mod level_filter;
pub mod level_injector;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod sugared;
pub mod swap;
pub mod sweeten;
pub mod sync;
pub mod timestamp;
pub mod value;
pub mod valuer;

pub use builder::{LoggerBuilder, LoggerConfig};
pub use callsite::CallSite;
pub use diagnostic::{
    CollectingDiagnostics, DiagnosticSink, PanicDiagnostics, ProcessDiagnostics, StderrDiagnostics,
};
pub use error::{InvalidPair, LoggerError, MalformedEventError, Result, SquelchError};
pub use level::{FilterOption, LevelFilter, LevelInjector};
pub use log_level::Level;
pub use logger::{Context, Logger, LoggerFn, NopLogger};
pub use metrics::EventMetrics;
pub use output_format::OutputFormat;
pub use sugared::{SugaredLogger, SugaredLoggerBuilder};
pub use swap::SwapLogger;
pub use sweeten::{sweeten, SweetenMode};
pub use sync::{SyncLogger, SyncWriter};
pub use timestamp::TimestampFormat;
pub use value::{Arg, Field, Value};
pub use valuer::Valuer;

//! Loosely-typed logging API
//!
//! [`SugaredLogger`] trades a little speed for a less verbose call site. For
//! each level it offers three methods: plain (`info`), templated (`infof`)
//! and structured (`infow`). Structured arguments are sweetened into fields,
//! so the result is the same key/value event the rest of the crate handles:
//!
//! ```text
//! [context..., level::key(), level, ("logger", name)?, "msg", message, fields...]
//! ```
//!
//! Events below `fatal` whose level the underlying logger reports as
//! disabled are dropped before the message is formatted or the arguments
//! are sweetened.

use super::callsite;
use super::diagnostic::{DiagnosticSink, ProcessDiagnostics};
use super::error::Result;
use super::level;
use super::log_level::Level;
use super::logger::{Context, Logger};
use super::sweeten::{sweeten, SweetenMode};
use super::value::{fields_to_keyvals, Arg, Value};
use parking_lot::Mutex;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Key under which the message is recorded
pub const MESSAGE_KEY: &str = "msg";

/// Key under which a named logger records its name
pub const LOGGER_KEY: &str = "logger";

/// Exit code passed to the exit function by `fatal` calls
pub const FATAL_EXIT_CODE: i32 = 1;

/// Called by `fatal` after logging; defaults to [`std::process::exit`]
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;

/// Run before the process exits on a `fatal` call
pub type ExitHandler = Arc<dyn Fn() + Send + Sync>;

/// A logger with printf-style and loosely-typed structured methods.
///
/// Cloning is cheap; clones share the context, the diagnostic sink and the
/// registered exit handlers.
///
/// # Example
///
/// ```
/// use kvlog_facade::{args, CaptureAppender, SugaredLogger};
/// use std::sync::Arc;
///
/// let capture = Arc::new(CaptureAppender::new());
/// let log = SugaredLogger::new(capture.clone())
///     .with(args!["rname", "testPool1"])
///     .unwrap();
///
/// log.infow("retrying", args!["attempt", 3, "backoff", "1s"]);
/// log.warnf(format_args!("pool {} degraded", 1));
/// assert_eq!(capture.len(), 2);
/// ```
#[derive(Clone)]
pub struct SugaredLogger {
    context: Context,
    name: Option<Arc<str>>,
    mode: SweetenMode,
    development: bool,
    diagnostics: Arc<dyn DiagnosticSink>,
    exit: ExitFn,
    exit_handlers: Arc<Mutex<Vec<ExitHandler>>>,
}

impl SugaredLogger {
    /// Lenient sugared logger over `logger`
    pub fn new<L: Logger + 'static>(logger: L) -> Self {
        Self::builder(logger).build()
    }

    pub fn builder<L: Logger + 'static>(logger: L) -> SugaredLoggerBuilder {
        SugaredLoggerBuilder::new(Context::new(logger))
    }

    /// Sugared view of an existing context
    pub fn from_context(context: Context) -> Self {
        SugaredLoggerBuilder::new(context).build()
    }

    /// The underlying key/value context
    pub fn desugar(&self) -> &Context {
        &self.context
    }

    pub fn mode(&self) -> SweetenMode {
        self.mode
    }

    /// Dotted name recorded under [`LOGGER_KEY`], if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether `dpanic` calls panic after logging
    pub fn is_development(&self) -> bool {
        self.development
    }

    /// Child logger with `name` appended to this logger's name.
    ///
    /// Segments are joined with `.`; an empty `name` leaves the name as is.
    pub fn named(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        let joined: Arc<str> = match &self.name {
            Some(parent) => format!("{}.{}", parent, name).into(),
            None => name.into(),
        };
        Self {
            name: Some(joined),
            ..self.clone()
        }
    }

    /// Child logger with `args` bound as context.
    ///
    /// In strict mode malformed arguments fail the call; otherwise they are
    /// dropped and reported.
    pub fn with(&self, args: Vec<Arg>) -> Result<Self> {
        let fields = sweeten(args, self.mode, &*self.diagnostics)?;
        Ok(Self {
            context: self.context.with(fields_to_keyvals(fields)),
            ..self.clone()
        })
    }

    /// Register a handler run by `fatal` before exiting.
    ///
    /// Handlers run in registration order; a panicking handler is reported
    /// and the rest still run.
    pub fn register_exit_handler<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.exit_handlers.lock().push(Arc::new(handler));
    }

    /// Log `message` with `args` at `level`, returning any sink failure.
    ///
    /// `panic` level panics after logging; `fatal` level flushes, runs exit
    /// handlers and calls the exit function.
    #[track_caller]
    pub fn log_at(&self, level: Level, message: &str, args: Vec<Arg>) -> Result<()> {
        if self.skips(level) {
            return Ok(());
        }
        let _site = callsite::enter();
        let result = self.write_event(level, message, args);
        self.terminate(level, message);
        result
    }

    /// Flush the underlying logger
    pub fn flush(&self) -> Result<()> {
        self.context.flush()
    }

    fn write_event(&self, level: Level, message: &str, args: Vec<Arg>) -> Result<()> {
        let fields = sweeten(args, self.mode, &*self.diagnostics)?;
        let mut event = Vec::with_capacity(6 + fields.len() * 2);
        event.push(level::key());
        event.push(level::value(level));
        if let Some(name) = &self.name {
            event.push(Value::from(LOGGER_KEY));
            event.push(Value::from(&**name));
        }
        event.push(Value::from(MESSAGE_KEY));
        event.push(Value::from(message));
        event.extend(fields_to_keyvals(fields));
        self.context.log(&event)
    }

    #[track_caller]
    fn emit(&self, level: Level, message: &str, args: Vec<Arg>) {
        let _site = callsite::enter();
        if let Err(e) = self.write_event(level, message, args) {
            eprintln!("[LOGGER ERROR] Failed to log {} event: {}", level, e);
        }
        self.terminate(level, message);
    }

    /// Disabled below `fatal`; `fatal` and `panic` always log and terminate
    fn skips(&self, level: Level) -> bool {
        level < Level::Fatal && !self.context.enabled(level)
    }

    #[track_caller]
    fn emit_dpanic(&self, message: &str, args: Vec<Arg>) {
        self.emit(Level::Error, message, args);
        if self.development {
            panic!("{}", message);
        }
    }

    fn terminate(&self, level: Level, message: &str) {
        match level {
            Level::Panic => panic!("{}", message),
            Level::Fatal => self.exit(),
            _ => {}
        }
    }

    fn exit(&self) {
        if let Err(e) = self.context.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        let handlers = self.exit_handlers.lock().clone();
        for handler in handlers {
            if panic::catch_unwind(AssertUnwindSafe(|| handler())).is_err() {
                eprintln!("[LOGGER ERROR] Exit handler panicked");
            }
        }
        (self.exit)(FATAL_EXIT_CODE);
    }
}

macro_rules! sugared_methods {
    ($($level:ident => $plain:ident, $templated:ident, $structured:ident;)*) => {
        impl SugaredLogger {
            $(
                #[doc = concat!("Log `message` at `", stringify!($plain), "`.")]
                #[track_caller]
                pub fn $plain(&self, message: impl fmt::Display) {
                    if self.skips(Level::$level) {
                        return;
                    }
                    self.emit(Level::$level, &message.to_string(), Vec::new());
                }

                #[doc = concat!("Log a templated message at `", stringify!($plain), "`.")]
                #[track_caller]
                pub fn $templated(&self, args: fmt::Arguments<'_>) {
                    if self.skips(Level::$level) {
                        return;
                    }
                    self.emit(Level::$level, &fmt::format(args), Vec::new());
                }

                #[doc = concat!("Log `message` with key/value `args` at `", stringify!($plain), "`.")]
                #[track_caller]
                pub fn $structured(&self, message: impl fmt::Display, args: Vec<Arg>) {
                    if self.skips(Level::$level) {
                        return;
                    }
                    self.emit(Level::$level, &message.to_string(), args);
                }
            )*
        }
    };
}

sugared_methods! {
    Trace => trace, tracef, tracew;
    Debug => debug, debugf, debugw;
    Info => info, infof, infow;
    Warn => warn, warnf, warnw;
    Error => error, errorf, errorw;
    Fatal => fatal, fatalf, fatalw;
    Panic => panic, panicf, panicw;
}

impl SugaredLogger {
    /// Log `message` at `error`; a development logger then panics.
    #[track_caller]
    pub fn dpanic(&self, message: impl fmt::Display) {
        if !self.development && self.skips(Level::Error) {
            return;
        }
        self.emit_dpanic(&message.to_string(), Vec::new());
    }

    /// Log a templated message at `error`; a development logger then panics.
    #[track_caller]
    pub fn dpanicf(&self, args: fmt::Arguments<'_>) {
        if !self.development && self.skips(Level::Error) {
            return;
        }
        self.emit_dpanic(&fmt::format(args), Vec::new());
    }

    /// Log `message` with key/value `args` at `error`; a development logger
    /// then panics.
    #[track_caller]
    pub fn dpanicw(&self, message: impl fmt::Display, args: Vec<Arg>) {
        if !self.development && self.skips(Level::Error) {
            return;
        }
        self.emit_dpanic(&message.to_string(), args);
    }
}

impl fmt::Debug for SugaredLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SugaredLogger")
            .field("context", &self.context)
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("development", &self.development)
            .field("exit_handlers", &self.exit_handlers.lock().len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SugaredLogger`]
pub struct SugaredLoggerBuilder {
    context: Context,
    mode: SweetenMode,
    development: bool,
    diagnostics: Arc<dyn DiagnosticSink>,
    exit: ExitFn,
}

impl SugaredLoggerBuilder {
    fn new(context: Context) -> Self {
        Self {
            context,
            mode: SweetenMode::default(),
            development: false,
            diagnostics: Arc::new(ProcessDiagnostics),
            exit: Arc::new(|code| std::process::exit(code)),
        }
    }

    /// Set how malformed key/value arguments are handled
    #[must_use = "builder methods return a new value"]
    pub fn mode(mut self, mode: SweetenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Make `dpanic` calls panic after logging
    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Set where lenient-mode diagnostics go.
    ///
    /// Defaults to the process-wide sink.
    #[must_use = "builder methods return a new value"]
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Replace the function `fatal` calls after logging
    #[must_use = "builder methods return a new value"]
    pub fn exit_fn<F>(mut self, exit: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.exit = Arc::new(exit);
        self
    }

    pub fn build(self) -> SugaredLogger {
        SugaredLogger {
            context: self.context,
            name: None,
            mode: self.mode,
            development: self.development,
            diagnostics: self.diagnostics,
            exit: self.exit,
            exit_handlers: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

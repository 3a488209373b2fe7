//! The `Logger` capability and contextual loggers
//!
//! Every piece of the facade is a [`Logger`]: level decorators, the swap and
//! sync wrappers, and the appenders at the end of the chain. A logger takes
//! one event as an interleaved `key, value, key, value, ...` slice.

use super::callsite;
use super::diagnostic;
use super::error::{MalformedEventError, Result};
use super::log_level::Level;
use super::value::Value;
use super::valuer::{bind_values, contains_valuer};
use std::fmt;
use std::sync::Arc;

/// Accepts one log event as interleaved key/value pairs.
///
/// An `Ok` return means the event was accepted, not that it reached durable
/// storage. Implementations never mutate the caller's slice; decorators that
/// add pairs build a new sequence.
pub trait Logger: Send + Sync {
    /// Log one event.
    ///
    /// The slice is passed on as given. An odd-length slice is not repaired:
    /// its trailing key has no value, level lookups skip it and the bundled
    /// encoders render its value as `(MISSING)`. Use
    /// [`SugaredLogger`](super::sugared::SugaredLogger) to have such input
    /// dropped and reported instead.
    ///
    /// The caller's location is tracked through every implementation, so a
    /// [`Context`] can record it for `caller` valuers.
    #[track_caller]
    fn log(&self, keyvals: &[Value]) -> Result<()>;

    /// Flush anything buffered downstream
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// True if an event tagged `level` could get past this logger.
    ///
    /// A hint for skipping expensive event construction; `log` still decides.
    fn enabled(&self, _level: Level) -> bool {
        true
    }
}

impl<L: Logger + ?Sized> Logger for &L {
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        (**self).log(keyvals)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        (**self).log(keyvals)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        (**self).log(keyvals)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }
}

/// Adapts a closure into a [`Logger`].
pub struct LoggerFn<F>(F);

impl<F> LoggerFn<F>
where
    F: Fn(&[Value]) -> Result<()> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Logger for LoggerFn<F>
where
    F: Fn(&[Value]) -> Result<()> + Send + Sync,
{
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        (self.0)(keyvals)
    }
}

impl<F> fmt::Debug for LoggerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoggerFn(..)")
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn log(&self, _keyvals: &[Value]) -> Result<()> {
        Ok(())
    }
}

/// A logger with bound key/value pairs.
///
/// Bound pairs are shared, never copied per event beyond the final sequence
/// handed downstream, and any [`Valuer`](super::valuer::Valuer) among them is
/// evaluated again for every event.
///
/// # Example
///
/// ```
/// use kvlog_facade::{keyvals, CaptureAppender, Context, Logger};
/// use std::sync::Arc;
///
/// let capture = Arc::new(CaptureAppender::new());
/// let ctx = Context::new(capture.clone()).with(keyvals!["rname", "testPool1"]);
///
/// ctx.log(&keyvals!["attempt", 3]).unwrap();
/// assert_eq!(capture.events()[0], keyvals!["rname", "testPool1", "attempt", 3]);
/// ```
#[derive(Clone)]
pub struct Context {
    logger: Arc<dyn Logger>,
    keyvals: Arc<[Value]>,
    has_valuer: bool,
}

impl Context {
    /// Context over `logger` with no bound pairs
    pub fn new<L: Logger + 'static>(logger: L) -> Self {
        Self::from_arc(Arc::new(logger))
    }

    pub fn from_arc(logger: Arc<dyn Logger>) -> Self {
        Self {
            logger,
            keyvals: Arc::from(Vec::new()),
            has_valuer: false,
        }
    }

    /// New context with `keyvals` appended after the bound pairs.
    ///
    /// A trailing key without a value is dropped and reported to the
    /// process-wide diagnostic sink.
    pub fn with(&self, keyvals: Vec<Value>) -> Self {
        let keyvals = even_keyvals(keyvals, self.keyvals.len());
        if keyvals.is_empty() {
            return self.clone();
        }
        let mut merged = Vec::with_capacity(self.keyvals.len() + keyvals.len());
        merged.extend_from_slice(&self.keyvals);
        merged.extend(keyvals);
        self.rebuild(merged)
    }

    /// New context with `keyvals` placed before the bound pairs.
    pub fn with_prefix(&self, keyvals: Vec<Value>) -> Self {
        let mut merged = even_keyvals(keyvals, 0);
        if merged.is_empty() {
            return self.clone();
        }
        merged.extend_from_slice(&self.keyvals);
        self.rebuild(merged)
    }

    fn rebuild(&self, keyvals: Vec<Value>) -> Self {
        Self {
            logger: Arc::clone(&self.logger),
            has_valuer: contains_valuer(&keyvals),
            keyvals: Arc::from(keyvals),
        }
    }

    /// Bound pairs, valuers unevaluated
    pub fn keyvals(&self) -> &[Value] {
        &self.keyvals
    }

    /// The wrapped logger
    pub fn inner(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Log with the caller's location recorded for `caller` valuers.
    #[track_caller]
    pub fn emit(&self, keyvals: &[Value]) -> Result<()> {
        let _site = callsite::enter();
        self.log(keyvals)
    }
}

impl Logger for Context {
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        // outermost untracked call: record the site of the `log` call itself
        let _site = callsite::enter_if_untracked();
        if self.keyvals.is_empty() {
            return self.logger.log(keyvals);
        }
        let mut event = Vec::with_capacity(self.keyvals.len() + keyvals.len());
        event.extend_from_slice(&self.keyvals);
        if self.has_valuer {
            bind_values(&mut event);
        }
        event.extend_from_slice(keyvals);
        self.logger.log(&event)
    }

    fn flush(&self) -> Result<()> {
        self.logger.flush()
    }

    fn enabled(&self, level: Level) -> bool {
        self.logger.enabled(level)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("keyvals", &self.keyvals)
            .field("has_valuer", &self.has_valuer)
            .finish_non_exhaustive()
    }
}

/// Drop a dangling trailing key, reporting it. `offset` is the position the
/// first element will take in the bound sequence.
fn even_keyvals(mut keyvals: Vec<Value>, offset: usize) -> Vec<Value> {
    if keyvals.len() % 2 == 1 {
        let position = offset + keyvals.len() - 1;
        if let Some(key) = keyvals.pop() {
            diagnostic::report(&MalformedEventError::OddArgumentCount { position, key });
        }
    }
    keyvals
}

/// Shorthand for `Context::new(logger).with(keyvals)`
pub fn with<L: Logger + 'static>(logger: L, keyvals: Vec<Value>) -> Context {
    Context::new(logger).with(keyvals)
}

/// Shorthand for `Context::new(logger).with_prefix(keyvals)`
pub fn with_prefix<L: Logger + 'static>(logger: L, keyvals: Vec<Value>) -> Context {
    Context::new(logger).with_prefix(keyvals)
}

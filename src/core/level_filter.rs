//! Severity filtering

use super::error::{LoggerError, Result, SquelchError};
use super::level::find;
use super::log_level::Level;
use super::logger::Logger;
use super::metrics::EventMetrics;
use super::value::Value;
use std::fmt;
use std::sync::Arc;

/// Configuration applied when building a [`LevelFilter`].
///
/// Options are applied in order; a later option overrides an earlier one
/// that sets the same thing.
#[derive(Clone)]
pub enum FilterOption {
    /// trace and everything above
    AllowAll,
    /// debug, info, warn, error, fatal, panic
    AllowDebug,
    /// info, warn, error, fatal, panic
    AllowInfo,
    /// warn, error, fatal, panic
    AllowWarn,
    /// error and above. The two levels more severe than error, fatal and
    /// panic, are admitted as well.
    AllowError,
    /// no leveled events
    AllowNone,
    /// the given level and everything above
    Allow(Level),
    /// Error returned when an event's level is not allowed
    ErrNotAllowed(SquelchError),
    /// Squelch events that carry no recognized level
    SquelchNoLevel(bool),
    /// Error returned when an event is squelched for having no level
    ErrNoLevel(SquelchError),
}

impl FilterOption {
    /// Wrap a caller error for [`FilterOption::ErrNotAllowed`]
    pub fn err_not_allowed<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FilterOption::ErrNotAllowed(Arc::new(err))
    }

    /// Wrap a caller error for [`FilterOption::ErrNoLevel`]
    pub fn err_no_level<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FilterOption::ErrNoLevel(Arc::new(err))
    }
}

impl fmt::Debug for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOption::AllowAll => f.write_str("AllowAll"),
            FilterOption::AllowDebug => f.write_str("AllowDebug"),
            FilterOption::AllowInfo => f.write_str("AllowInfo"),
            FilterOption::AllowWarn => f.write_str("AllowWarn"),
            FilterOption::AllowError => f.write_str("AllowError"),
            FilterOption::AllowNone => f.write_str("AllowNone"),
            FilterOption::Allow(level) => write!(f, "Allow({})", level),
            FilterOption::ErrNotAllowed(err) => write!(f, "ErrNotAllowed({})", err),
            FilterOption::SquelchNoLevel(squelch) => write!(f, "SquelchNoLevel({})", squelch),
            FilterOption::ErrNoLevel(err) => write!(f, "ErrNoLevel({})", err),
        }
    }
}

/// Forwards or squelches events according to their severity.
///
/// Only levels built by this crate are recognized: an event whose level key
/// carries anything else is handled by the no-level policy. With no options
/// every leveled event is squelched and unleveled events pass.
///
/// Configuration is immutable once built. Event counters are opt-in through
/// [`with_metrics`](Self::with_metrics).
///
/// # Example
///
/// ```
/// use kvlog_facade::level::{self, FilterOption};
/// use kvlog_facade::{keyvals, CaptureAppender, Level, Logger};
///
/// let capture = CaptureAppender::new();
/// let filter = level::new_filter(&capture, [FilterOption::AllowWarn]);
///
/// filter.log(&keyvals![level::key(), Level::Info, "msg", "dropped"]).unwrap();
/// filter.log(&keyvals![level::key(), Level::Error, "msg", "kept"]).unwrap();
/// assert_eq!(capture.len(), 1);
/// ```
pub struct LevelFilter<L> {
    next: L,
    allowed: u8,
    err_not_allowed: Option<SquelchError>,
    squelch_no_level: bool,
    err_no_level: Option<SquelchError>,
    metrics: Option<EventMetrics>,
}

impl<L: Logger> LevelFilter<L> {
    pub fn new<I>(next: L, options: I) -> Self
    where
        I: IntoIterator<Item = FilterOption>,
    {
        let mut filter = Self {
            next,
            allowed: 0,
            err_not_allowed: None,
            squelch_no_level: false,
            err_no_level: None,
            metrics: None,
        };
        for option in options {
            filter.apply(option);
        }
        filter
    }

    fn apply(&mut self, option: FilterOption) {
        match option {
            FilterOption::AllowAll => self.allowed = Level::Trace.and_above(),
            FilterOption::AllowDebug => self.allowed = Level::Debug.and_above(),
            FilterOption::AllowInfo => self.allowed = Level::Info.and_above(),
            FilterOption::AllowWarn => self.allowed = Level::Warn.and_above(),
            FilterOption::AllowError => self.allowed = Level::Error.and_above(),
            FilterOption::AllowNone => self.allowed = 0,
            FilterOption::Allow(level) => self.allowed = level.and_above(),
            FilterOption::ErrNotAllowed(err) => self.err_not_allowed = Some(err),
            FilterOption::SquelchNoLevel(squelch) => self.squelch_no_level = squelch,
            FilterOption::ErrNoLevel(err) => self.err_no_level = Some(err),
        }
    }

    /// True if events tagged `level` pass this filter
    #[inline]
    pub fn allows(&self, level: Level) -> bool {
        self.allowed & level.bit() != 0
    }

    /// Count forwarded, squelched and failed events
    #[must_use = "builder methods return a new value"]
    pub fn with_metrics(mut self) -> Self {
        self.metrics = Some(EventMetrics::new());
        self
    }

    /// Counters, when enabled with [`with_metrics`](Self::with_metrics)
    pub fn metrics(&self) -> Option<&EventMetrics> {
        self.metrics.as_ref()
    }

    #[track_caller]
    fn forward(&self, keyvals: &[Value]) -> Result<()> {
        let result = self.next.log(keyvals);
        if let Some(metrics) = &self.metrics {
            metrics.record_forwarded();
            if result.is_err() {
                metrics.record_failed();
            }
        }
        result
    }

    fn squelch(&self, err: &Option<SquelchError>) -> Result<()> {
        if let Some(metrics) = &self.metrics {
            metrics.record_squelched();
        }
        match err {
            Some(err) => Err(LoggerError::squelched(err)),
            None => Ok(()),
        }
    }
}

impl<L: Logger> Logger for LevelFilter<L> {
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        match find(keyvals) {
            Some(level) if self.allows(level) => self.forward(keyvals),
            Some(_) => self.squelch(&self.err_not_allowed),
            None if self.squelch_no_level => self.squelch(&self.err_no_level),
            None => self.forward(keyvals),
        }
    }

    fn flush(&self) -> Result<()> {
        self.next.flush()
    }

    fn enabled(&self, level: Level) -> bool {
        self.allows(level) && self.next.enabled(level)
    }
}

impl<L> fmt::Debug for LevelFilter<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelFilter")
            .field("allowed", &format_args!("{:#09b}", self.allowed))
            .field("squelch_no_level", &self.squelch_no_level)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

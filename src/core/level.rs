//! Leveled logging on top of plain key/value loggers
//!
//! Severity travels inside the event as the pair `(key(), Level)`. The key is
//! an opaque marker rather than the string `"level"`, and values are this
//! crate's closed [`Level`] set, so a filter cannot be bypassed by another
//! component emitting look-alike strings.

use super::log_level::Level;
use super::logger::{Context, Logger};
use super::value::Value;

pub use super::level_filter::{FilterOption, LevelFilter};
pub use super::level_injector::LevelInjector;

/// The canonical key tagging an event's severity.
#[inline]
pub fn key() -> Value {
    Value::LevelKey
}

/// The canonical value marker for `level`.
#[inline]
pub fn value(level: Level) -> Value {
    Value::Level(level)
}

/// Severity tag of an event.
///
/// Stops at the first canonical level key. Returns `None` when there is no
/// such key, or when its value is not one of this crate's level markers.
pub fn find(keyvals: &[Value]) -> Option<Level> {
    keyvals
        .chunks_exact(2)
        .find(|pair| pair[0].is_level_key())
        .and_then(|pair| pair[1].as_level())
}

/// True if the event carries the canonical level key at a key position.
pub fn has_key(keyvals: &[Value]) -> bool {
    keyvals.chunks_exact(2).any(|pair| pair[0].is_level_key())
}

/// Context that tags every event with `level`.
pub fn at<L: Logger + 'static>(logger: L, level: Level) -> Context {
    Context::new(logger).with_prefix(vec![key(), value(level)])
}

macro_rules! level_helpers {
    ($($(#[$meta:meta])* $name:ident => $level:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name<L: Logger + 'static>(logger: L) -> Context {
                at(logger, Level::$level)
            }
        )*
    };
}

level_helpers! {
    /// Context tagging events with `trace`
    trace => Trace,
    /// Context tagging events with `debug`
    debug => Debug,
    /// Context tagging events with `info`
    info => Info,
    /// Context tagging events with `warn`
    warn => Warn,
    /// Context tagging events with `error`
    error => Error,
    /// Context tagging events with `fatal`
    fatal => Fatal,
    /// Context tagging events with `panic`
    panic => Panic,
}

/// Wrap `next` in a [`LevelFilter`] built from `options`.
pub fn new_filter<L, I>(next: L, options: I) -> LevelFilter<L>
where
    L: Logger,
    I: IntoIterator<Item = FilterOption>,
{
    LevelFilter::new(next, options)
}

/// Wrap `next` in a [`LevelInjector`] defaulting to `level`.
pub fn new_injector<L: Logger>(next: L, level: Level) -> LevelInjector<L> {
    LevelInjector::new(next, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::CaptureAppender;
    use crate::keyvals;
    use std::sync::Arc;

    #[test]
    fn test_find_level() {
        assert_eq!(find(&keyvals![key(), Level::Warn, "a", 1]), Some(Level::Warn));
        assert_eq!(find(&keyvals!["a", 1, key(), Level::Debug]), Some(Level::Debug));
        assert_eq!(find(&keyvals!["a", 1]), None);
    }

    #[test]
    fn test_find_stops_at_first_key() {
        let kv = keyvals![key(), "error", key(), Level::Error];
        assert_eq!(find(&kv), None);
    }

    #[test]
    fn test_string_lookalikes_ignored() {
        assert_eq!(find(&keyvals!["level", Level::Error]), None);
        assert_eq!(find(&keyvals![key(), "error"]), None);
        // key in value position does not count
        assert!(!has_key(&keyvals!["a", key()]));
    }

    #[test]
    fn test_level_helpers_prefix() {
        let capture = Arc::new(CaptureAppender::new());
        error(capture.clone()).log(&keyvals!["msg", "boom"]).unwrap();
        info(capture.clone()).log(&[]).unwrap();

        let events = capture.events();
        assert_eq!(events[0], keyvals![key(), Level::Error, "msg", "boom"]);
        assert_eq!(find(&events[1]), Some(Level::Info));
    }
}

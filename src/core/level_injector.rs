//! Default level injection

use super::error::Result;
use super::level::{has_key, key, value};
use super::log_level::Level;
use super::logger::Logger;
use super::value::Value;

/// Prepends `(level key, level)` to events that carry no level key.
///
/// Events that already have one pass through untouched, whatever its value.
/// Holds no mutable state.
#[derive(Debug, Clone)]
pub struct LevelInjector<L> {
    next: L,
    level: Level,
}

impl<L: Logger> LevelInjector<L> {
    pub fn new(next: L, level: Level) -> Self {
        Self { next, level }
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl<L: Logger> Logger for LevelInjector<L> {
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        if has_key(keyvals) {
            return self.next.log(keyvals);
        }
        let mut event = Vec::with_capacity(keyvals.len() + 2);
        event.push(key());
        event.push(value(self.level));
        event.extend_from_slice(keyvals);
        self.next.log(&event)
    }

    fn flush(&self) -> Result<()> {
        self.next.flush()
    }

    fn enabled(&self, level: Level) -> bool {
        self.next.enabled(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::CaptureAppender;
    use crate::keyvals;

    #[test]
    fn test_injects_when_absent() {
        let capture = CaptureAppender::new();
        let injector = LevelInjector::new(&capture, Level::Info);
        injector.log(&keyvals!["msg", "hi"]).unwrap();

        assert_eq!(capture.events()[0], keyvals![key(), Level::Info, "msg", "hi"]);
    }

    #[test]
    fn test_existing_level_not_overwritten() {
        let capture = CaptureAppender::new();
        let injector = LevelInjector::new(&capture, Level::Info);
        injector.log(&keyvals![key(), Level::Error, "msg", "boom"]).unwrap();

        let event = &capture.events()[0];
        assert_eq!(event, &keyvals![key(), Level::Error, "msg", "boom"]);
        assert_eq!(event.iter().filter(|v| v.is_level_key()).count(), 1);
    }

    #[test]
    fn test_enabled_forwarded() {
        let filter = crate::core::level::new_filter(
            crate::core::logger::NopLogger,
            [crate::FilterOption::AllowInfo],
        );
        let injector = LevelInjector::new(filter, Level::Info);
        assert!(!injector.enabled(Level::Debug));
        assert!(injector.enabled(Level::Info));
    }

    #[test]
    fn test_foreign_level_value_kept() {
        let capture = CaptureAppender::new();
        let injector = LevelInjector::new(&capture, Level::Debug);
        injector.log(&keyvals![key(), "custom"]).unwrap();

        assert_eq!(capture.events()[0], keyvals![key(), "custom"]);
    }
}

//! In-memory appender for tests

use crate::core::{Logger, Result, Value};
use parking_lot::Mutex;

/// Records every event it receives, with valuers evaluated.
///
/// # Example
///
/// ```
/// use kvlog_facade::{keyvals, CaptureAppender, Logger};
///
/// let capture = CaptureAppender::new();
/// capture.log(&keyvals!["user", "alice"]).unwrap();
/// assert_eq!(capture.events(), vec![keyvals!["user", "alice"]]);
/// ```
#[derive(Debug, Default)]
pub struct CaptureAppender {
    events: Mutex<Vec<Vec<Value>>>,
}

impl CaptureAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of every event recorded so far
    pub fn events(&self) -> Vec<Vec<Value>> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Remove and return every recorded event
    pub fn take(&self) -> Vec<Vec<Value>> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl Logger for CaptureAppender {
    fn log(&self, keyvals: &[Value]) -> Result<()> {
        let event = keyvals.iter().map(Value::resolve).collect();
        self.events.lock().push(event);
        Ok(())
    }
}

//! Side-channel for malformed-input diagnostics
//!
//! Malformed key/value input never fails a lenient logging call. Instead the
//! problem is reported here, on a channel kept apart from application events
//! so test harnesses can assert on it without inspecting sink output.

use super::error::MalformedEventError;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Receiver of malformed-input diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &MalformedEventError);
}

/// Prints diagnostics to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrDiagnostics;

impl DiagnosticSink for StderrDiagnostics {
    fn report(&self, diagnostic: &MalformedEventError) {
        eprintln!("[LOGGER DIAGNOSTIC] {}", diagnostic);
    }
}

/// Panics on the first diagnostic; for development and fast-fail test runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicDiagnostics;

impl DiagnosticSink for PanicDiagnostics {
    fn report(&self, diagnostic: &MalformedEventError) {
        panic!("[LOGGER DIAGNOSTIC] {}", diagnostic);
    }
}

/// Keeps every diagnostic in memory.
///
/// # Example
///
/// ```
/// use kvlog_facade::{args, sweeten, CollectingDiagnostics, SweetenMode};
///
/// let diagnostics = CollectingDiagnostics::new();
/// let fields = sweeten(args!["user", "alice", "dangling"], SweetenMode::Lenient, &diagnostics).unwrap();
///
/// assert_eq!(fields.len(), 1);
/// assert_eq!(diagnostics.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    reports: Mutex<Vec<MalformedEventError>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of everything reported so far
    pub fn reports(&self) -> Vec<MalformedEventError> {
        self.reports.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }

    /// Remove and return everything reported so far
    pub fn take(&self) -> Vec<MalformedEventError> {
        std::mem::take(&mut *self.reports.lock())
    }
}

impl DiagnosticSink for CollectingDiagnostics {
    fn report(&self, diagnostic: &MalformedEventError) {
        self.reports.lock().push(diagnostic.clone());
    }
}

impl<D: DiagnosticSink + ?Sized> DiagnosticSink for Arc<D> {
    fn report(&self, diagnostic: &MalformedEventError) {
        (**self).report(diagnostic);
    }
}

impl<D: DiagnosticSink + ?Sized> DiagnosticSink for &D {
    fn report(&self, diagnostic: &MalformedEventError) {
        (**self).report(diagnostic);
    }
}

static PROCESS_SINK: Lazy<RwLock<Arc<dyn DiagnosticSink>>> =
    Lazy::new(|| RwLock::new(Arc::new(StderrDiagnostics)));

/// Install the process-wide diagnostic sink used by [`Context`](super::logger::Context).
pub fn set_sink(sink: Arc<dyn DiagnosticSink>) {
    *PROCESS_SINK.write() = sink;
}

/// The process-wide diagnostic sink.
pub fn sink() -> Arc<dyn DiagnosticSink> {
    Arc::clone(&*PROCESS_SINK.read())
}

/// Report through the process-wide sink.
pub fn report(diagnostic: &MalformedEventError) {
    sink().report(diagnostic);
}

/// Forwards to whatever sink is installed process-wide at report time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessDiagnostics;

impl DiagnosticSink for ProcessDiagnostics {
    fn report(&self, diagnostic: &MalformedEventError) {
        report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;

    fn odd(key: &str) -> MalformedEventError {
        MalformedEventError::OddArgumentCount {
            position: 0,
            key: Value::from(key),
        }
    }

    #[test]
    fn test_collecting_diagnostics() {
        let diagnostics = CollectingDiagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.report(&odd("a"));
        diagnostics.report(&odd("b"));
        assert_eq!(diagnostics.len(), 2);

        let taken = diagnostics.take();
        assert_eq!(taken, vec![odd("a"), odd("b")]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    #[should_panic(expected = "Ignored key without a value")]
    fn test_panic_diagnostics() {
        PanicDiagnostics.report(&odd("dangling"));
    }

    #[test]
    fn test_shared_sink_forwarding() {
        let diagnostics = Arc::new(CollectingDiagnostics::new());
        let shared: Arc<dyn DiagnosticSink> = diagnostics.clone();
        shared.report(&odd("x"));
        assert_eq!(diagnostics.len(), 1);
    }
}

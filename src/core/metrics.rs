//! Event counters for level filters
//!
//! Tracks how many events a filter forwarded, squelched, or saw fail
//! downstream. Counters are relaxed atomics; they never gate behavior.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters a [`LevelFilter`](super::level_filter::LevelFilter) keeps once
/// built with `with_metrics`.
///
/// # Example
///
/// ```
/// use kvlog_facade::EventMetrics;
///
/// let metrics = EventMetrics::new();
/// metrics.record_forwarded();
/// metrics.record_squelched();
///
/// assert_eq!(metrics.forwarded(), 1);
/// assert_eq!(metrics.squelched(), 1);
/// ```
#[derive(Debug)]
pub struct EventMetrics {
    /// Events passed to the next logger
    forwarded: AtomicU64,

    /// Events dropped by severity policy
    squelched: AtomicU64,

    /// Forwarded events the next logger rejected
    failed: AtomicU64,
}

impl EventMetrics {
    pub const fn new() -> Self {
        Self {
            forwarded: AtomicU64::new(0),
            squelched: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn squelched(&self) -> u64 {
        self.squelched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Returns the previous count
    #[inline]
    pub fn record_forwarded(&self) -> u64 {
        self.forwarded.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_squelched(&self) -> u64 {
        self.squelched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Squelched share of all events seen, as a percentage (0.0 - 100.0)
    pub fn squelch_rate(&self) -> f64 {
        let squelched = self.squelched() as f64;
        let total = self.forwarded() as f64 + squelched;
        if total == 0.0 {
            0.0
        } else {
            (squelched / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.forwarded.store(0, Ordering::Relaxed);
        self.squelched.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }
}

impl Default for EventMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            forwarded: AtomicU64::new(self.forwarded()),
            squelched: AtomicU64::new(self.squelched()),
            failed: AtomicU64::new(self.failed()),
        }
    }
}

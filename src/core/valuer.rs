//! Deferred values re-evaluated for every log event
//!
//! A [`Valuer`] bound into a [`Context`](super::logger::Context) is invoked
//! each time that context emits an event, so timestamps and call sites
//! reflect the moment of logging rather than the moment of binding.

use super::callsite;
use super::timestamp::TimestampFormat;
use super::value::Value;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt;
use std::sync::Arc;

/// A zero-argument value producer.
#[derive(Clone)]
pub struct Valuer(Arc<dyn Fn() -> Value + Send + Sync>);

impl Valuer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Produce the value for the event currently being emitted
    #[inline]
    pub fn evaluate(&self) -> Value {
        (self.0)()
    }

    pub(crate) fn ptr_eq(&self, other: &Valuer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Valuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Valuer(..)")
    }
}

/// Valuer returning the time produced by `now`.
pub fn timestamp<F, Tz>(now: F) -> Valuer
where
    F: Fn() -> DateTime<Tz> + Send + Sync + 'static,
    Tz: TimeZone,
{
    Valuer::new(move || Value::from(now()))
}

/// Valuer returning the time produced by `now`, rendered with `format`.
pub fn timestamp_format<F>(now: F, format: TimestampFormat) -> Valuer
where
    F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
{
    Valuer::new(move || format.to_value(&now()))
}

/// Local wall-clock time in RFC 3339 with nanoseconds.
pub fn default_timestamp() -> Valuer {
    Valuer::new(|| Value::Str(Local::now().to_rfc3339_opts(chrono::SecondsFormat::Nanos, false)))
}

/// UTC time in RFC 3339 with nanoseconds.
pub fn default_timestamp_utc() -> Valuer {
    Valuer::new(|| Value::Str(Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)))
}

/// Valuer returning `file:line` of a recorded call site.
///
/// `depth` 0 is the innermost tracked entry point on the current thread;
/// wrapping layers that enter through another tracked call raise it to skip
/// their own frames. Evaluates to `Null` when no call site is recorded.
pub fn caller(depth: usize) -> Valuer {
    Valuer::new(move || {
        callsite::current(depth)
            .map(|site| Value::Str(site.to_string()))
            .unwrap_or(Value::Null)
    })
}

/// Call site of the innermost tracked logging call.
pub fn default_caller() -> Valuer {
    caller(0)
}

/// True if any value slot (odd index) holds a [`Valuer`].
pub fn contains_valuer(keyvals: &[Value]) -> bool {
    keyvals.iter().skip(1).step_by(2).any(Value::is_valuer)
}

/// Evaluate every valuer in a value slot, leaving keys untouched.
pub(crate) fn bind_values(keyvals: &mut [Value]) {
    for value in keyvals.iter_mut().skip(1).step_by(2) {
        if let Value::Valuer(valuer) = value {
            *value = valuer.evaluate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_valuer_evaluates_each_time() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let valuer = Valuer::new(move || Value::from(c.fetch_add(1, Ordering::SeqCst)));

        assert_eq!(valuer.evaluate(), Value::U64(0));
        assert_eq!(valuer.evaluate(), Value::U64(1));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_bind_values_only_touches_values() {
        let key_valuer = Valuer::new(|| Value::from("evaluated"));
        let mut keyvals = vec![
            Value::Valuer(key_valuer),
            Value::from(1),
            Value::from("ts"),
            Value::Valuer(Valuer::new(|| Value::from(99))),
        ];
        assert!(contains_valuer(&keyvals));

        bind_values(&mut keyvals);
        assert!(keyvals[0].is_valuer());
        assert_eq!(keyvals[3], Value::I64(99));
        assert!(!contains_valuer(&keyvals));
    }

    #[test]
    fn test_timestamp_format_unix() {
        let fixed = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
        let valuer = timestamp_format(move || fixed, TimestampFormat::Unix);
        assert_eq!(valuer.evaluate(), Value::I64(1_736_332_245));
    }

    #[test]
    fn test_default_timestamp_utc_shape() {
        let value = default_timestamp_utc().evaluate();
        let s = value.as_str().unwrap();
        assert!(s.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(s).is_ok());
    }

    #[test]
    fn test_caller_without_site_is_null() {
        assert_eq!(caller(5).evaluate(), Value::Null);
    }

    #[test]
    fn test_caller_reports_tracked_site() {
        let _site = callsite::enter();
        let line = line!() - 1;
        let value = default_caller().evaluate();
        assert_eq!(value, Value::Str(format!("valuer.rs:{}", line)));
    }
}

//! Values carried in key/value log events
//!
//! This module provides:
//! - `Value`: the closed set of kinds a key or value may take
//! - `Field`: a resolved pair with a string key
//! - `Arg`: one element of a loosely-typed argument list before sweetening

use super::log_level::Level;
use super::valuer::Valuer;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::fmt;
use std::sync::Arc;

/// A key or value in a log event.
///
/// Function-shaped values cannot be stored directly; deferred computations
/// must go through [`Valuer`], and anything without a primitive form goes
/// through `Json` (serializable) or `Opaque` (debug-printed).
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
    Time(DateTime<FixedOffset>),
    Json(serde_json::Value),
    Error(Arc<dyn std::error::Error + Send + Sync>),
    Opaque(Arc<dyn fmt::Debug + Send + Sync>),
    /// Severity marker; only this crate's [`Level`] can occupy it
    Level(Level),
    /// The canonical key that tags an event's severity
    LevelKey,
    /// Deferred value evaluated when the event is emitted
    Valuer(Valuer),
}

impl Value {
    /// Wrap an error value
    pub fn error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Value::Error(Arc::new(err))
    }

    /// Wrap an arbitrary value rendered through its `Debug` impl
    pub fn opaque<T>(value: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Value::Opaque(Arc::new(value))
    }

    /// Borrow the string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_level(&self) -> Option<Level> {
        match self {
            Value::Level(level) => Some(*level),
            _ => None,
        }
    }

    #[inline]
    pub fn is_valuer(&self) -> bool {
        matches!(self, Value::Valuer(_))
    }

    #[inline]
    pub fn is_level_key(&self) -> bool {
        matches!(self, Value::LevelKey)
    }

    /// Evaluate a deferred value; other values are returned unchanged.
    pub fn resolve(&self) -> Value {
        match self {
            Value::Valuer(valuer) => valuer.evaluate(),
            other => other.clone(),
        }
    }

    /// Render this value as a key name
    pub fn key_name(&self) -> String {
        match self {
            Value::LevelKey => "level".to_string(),
            Value::Str(s) => s.clone(),
            other => other.resolve().to_string(),
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::I64(i) => serde_json::Value::Number((*i).into()),
            Value::U64(u) => serde_json::Value::Number((*u).into()),
            Value::F64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Json(json) => json.clone(),
            Value::Valuer(valuer) => valuer.evaluate().to_json_value(),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I64(i) => write!(f, "{}", i),
            Value::U64(u) => write!(f, "{}", u),
            Value::F64(fl) => write!(f, "{}", fl),
            Value::Str(s) => f.write_str(s),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Json(json) => write!(f, "{}", json),
            Value::Error(err) => write!(f, "{}", err),
            Value::Opaque(value) => write!(f, "{:?}", value),
            Value::Level(level) => f.write_str(level.to_str()),
            Value::LevelKey => f.write_str("level"),
            Value::Valuer(valuer) => write!(f, "{}", valuer.evaluate()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::LevelKey, Value::LevelKey) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Level(a), Value::Level(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => Arc::ptr_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            (Value::Valuer(a), Value::Valuer(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::I64(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::U64(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::F64(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::F64(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<Level> for Value {
    fn from(level: Level) -> Self {
        Value::Level(level)
    }
}

impl From<Valuer> for Value {
    fn from(valuer: Valuer) -> Self {
        Value::Valuer(valuer)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::Json(json)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(t: DateTime<Tz>) -> Self {
        Value::Time(t.fixed_offset())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// A resolved key/value pair with a string key.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Field holding an error under the conventional `error` key
    pub fn error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new("error", Value::error(err))
    }

    /// Flatten into the interleaved form loggers accept
    pub fn into_keyvals(self) -> [Value; 2] {
        [Value::Str(self.key), self.value]
    }
}

/// Flatten fields into an interleaved key/value sequence
pub fn fields_to_keyvals(fields: Vec<Field>) -> Vec<Value> {
    let mut keyvals = Vec::with_capacity(fields.len() * 2);
    for field in fields {
        keyvals.extend(field.into_keyvals());
    }
    keyvals
}

/// One element of a loosely-typed argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Already a typed field, consumed on its own
    Field(Field),
    /// Half of an implicit key/value pair
    Value(Value),
}

impl From<Field> for Arg {
    fn from(field: Field) -> Self {
        Arg::Field(field)
    }
}

impl<T: Into<Value>> From<T> for Arg {
    fn from(value: T) -> Self {
        Arg::Value(value.into())
    }
}

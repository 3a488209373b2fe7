//! Event encodings used by the bundled appenders
//!
//! Provides different output formats for key/value events:
//! - Logfmt: `key=value` pairs compatible with log aggregation tools (default)
//! - Json: one JSON object per event
//! - Text: human-readable `[LEVEL] message key=value ...`
//!
//! Valuers still present in an event are evaluated here, once per event.

use super::error::Result;
use super::level;
use super::value::Value;
use serde::{Deserialize, Serialize};

/// Rendered in place of the value of a trailing key
pub const MISSING_VALUE: &str = "(MISSING)";

/// Output format for events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Logfmt format (key=value pairs)
    ///
    /// Example: `level=info msg="Request processed" latency_ms=42`
    #[default]
    Logfmt,

    /// JSON format for machine processing
    ///
    /// Example: `{"latency_ms":42,"level":"info","msg":"Request processed"}`
    Json,

    /// Human-readable text format
    ///
    /// Example: `[INFO ] Request processed latency_ms=42`
    Text,
}

impl OutputFormat {
    /// Encode one event, without a trailing newline
    pub fn encode(&self, keyvals: &[Value]) -> Result<String> {
        match self {
            OutputFormat::Logfmt => Ok(format_logfmt(keyvals)),
            OutputFormat::Json => format_json(keyvals),
            OutputFormat::Text => Ok(format_text(keyvals)),
        }
    }
}

/// Key names paired with resolved values.
fn pairs(keyvals: &[Value]) -> impl Iterator<Item = (String, Value)> + '_ {
    keyvals.chunks(2).map(|pair| {
        let value = match pair.get(1) {
            Some(value) => value.resolve(),
            None => Value::from(MISSING_VALUE),
        };
        (pair[0].key_name(), value)
    })
}

/// Build a JSON object from an event. Later duplicates of a key win.
pub fn to_json_map(keyvals: &[Value]) -> serde_json::Map<String, serde_json::Value> {
    pairs(keyvals)
        .map(|(key, value)| (key, value.to_json_value()))
        .collect()
}

/// Format as JSON
pub fn format_json(keyvals: &[Value]) -> Result<String> {
    Ok(serde_json::to_string(&to_json_map(keyvals))?)
}

/// Format as logfmt
pub fn format_logfmt(keyvals: &[Value]) -> String {
    pairs(keyvals)
        .map(|(key, value)| format!("{}={}", escape_logfmt_key(&key), logfmt_value(&value)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format as `[LEVEL] message key=value ...`
pub fn format_text(keyvals: &[Value]) -> String {
    let level = level::find(keyvals)
        .map(|l| l.to_str().to_uppercase())
        .unwrap_or_default();
    format!("[{:5}] {}", level, text_body(keyvals))
}

/// Message followed by the remaining pairs in logfmt, without the level tag.
pub(crate) fn text_body(keyvals: &[Value]) -> String {
    let mut message = None;
    let mut rest = Vec::new();
    for pair in keyvals.chunks(2) {
        if pair[0].is_level_key() {
            continue;
        }
        if message.is_none() && pair[0].as_str() == Some("msg") {
            if let Some(value) = pair.get(1) {
                message = Some(value.resolve().to_string());
                continue;
            }
        }
        rest.extend_from_slice(pair);
    }

    let fields = format_logfmt(&rest);
    match (message, fields.is_empty()) {
        (Some(message), true) => message,
        (Some(message), false) => format!("{} {}", message, fields),
        (None, _) => fields,
    }
}

fn logfmt_value(value: &Value) -> String {
    match value {
        Value::Str(s) => escape_logfmt_value(s),
        Value::Null => "null".to_string(),
        Value::Bool(_) | Value::I64(_) | Value::U64(_) | Value::F64(_) | Value::Level(_) => {
            value.to_string()
        }
        other => escape_logfmt_value(&other.to_string()),
    }
}

/// Escape a logfmt key (remove spaces and special chars)
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}

/// Escape a logfmt value (quote if it contains spaces, quotes, `=` or controls)
fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty()
        || value
            .chars()
            .any(|c| c == ' ' || c == '"' || c == '=' || c.is_control())
    {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

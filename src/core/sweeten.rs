//! Normalization of loosely-typed argument lists into fields
//!
//! Arguments are either pre-built [`Field`]s or untyped values that pair up
//! as `key, value`. Malformed input is handled according to [`SweetenMode`]:
//! lenient mode drops the offending pairs and reports a diagnostic, strict
//! mode fails the whole call.

use super::diagnostic::DiagnosticSink;
use super::error::{InvalidPair, MalformedEventError, Result};
use super::value::{Arg, Field, Value};
use serde::{Deserialize, Serialize};

/// How malformed key/value input is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweetenMode {
    /// Drop malformed pairs, keep the rest, report to the diagnostic sink
    #[default]
    Lenient,
    /// Fail the whole call with `LoggerError::MalformedEvent`
    Strict,
}

/// Normalize `args` into an ordered list of fields.
///
/// In lenient mode this never fails: a dangling trailing key produces one
/// `OddArgumentCount` diagnostic, and all non-string keys are batched into a
/// single `NonStringKeys` diagnostic. In strict mode the first of those
/// errors (non-string keys take precedence) is returned and no fields are
/// produced.
pub fn sweeten<I, D>(args: I, mode: SweetenMode, diagnostics: &D) -> Result<Vec<Field>>
where
    I: IntoIterator<Item = Arg>,
    D: DiagnosticSink + ?Sized,
{
    let mut args = args.into_iter().enumerate().peekable();

    // Worst case every argument is already a field.
    let mut fields = Vec::with_capacity(args.size_hint().0);
    let mut invalid = Vec::new();
    let mut dangling = None;

    while let Some((position, arg)) = args.next() {
        let key = match arg {
            Arg::Field(field) => {
                fields.push(field);
                continue;
            }
            Arg::Value(key) => key,
        };

        let value = match args.next() {
            Some((_, Arg::Value(value))) => value,
            // A typed field in value position is taken as the value, rendered to JSON.
            Some((_, Arg::Field(field))) => Value::Json(serde_json::json!({
                field.key: field.value.to_json_value()
            })),
            None => {
                dangling = Some(MalformedEventError::OddArgumentCount { position, key });
                break;
            }
        };

        match key {
            Value::Str(key) => fields.push(Field { key, value }),
            key => invalid.push(InvalidPair {
                position,
                key,
                value,
            }),
        }
    }

    let non_string = if invalid.is_empty() {
        None
    } else {
        Some(MalformedEventError::NonStringKeys { pairs: invalid })
    };

    match mode {
        SweetenMode::Strict => {
            if let Some(err) = non_string.or(dangling) {
                return Err(err.into());
            }
        }
        SweetenMode::Lenient => {
            if let Some(err) = &dangling {
                diagnostics.report(err);
            }
            if let Some(err) = &non_string {
                diagnostics.report(err);
            }
        }
    }

    Ok(fields)
}

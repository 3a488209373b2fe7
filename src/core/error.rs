//! Error types for the logging facade

use super::value::Value;
use std::fmt;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Shared, caller-supplied error returned when an event is squelched.
pub type SquelchError = Arc<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error raised by a sink
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Malformed key/value input rejected in strict mode
    #[error("Malformed log event: {0}")]
    MalformedEvent(#[from] MalformedEventError),

    /// Event dropped by a level filter configured to surface squelches
    #[error("Log event squelched: {0}")]
    Squelched(SquelchError),

    /// Process-wide default logger installed twice
    #[error("Default logger already initialized")]
    AlreadyInitialized,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Wrap a caller-supplied squelch error
    pub fn squelched(err: &SquelchError) -> Self {
        LoggerError::Squelched(Arc::clone(err))
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// True when the error came from malformed key/value input
    pub fn is_malformed(&self) -> bool {
        matches!(self, LoggerError::MalformedEvent(_))
    }
}

/// A key/value pair whose key was not a string.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidPair {
    /// Index of the key within the original argument list
    pub position: usize,
    pub key: Value,
    pub value: Value,
}

impl fmt::Display for InvalidPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{position={} key={} value={}}}",
            self.position, self.key, self.value
        )
    }
}

/// Malformed key/value input found while building an event.
///
/// These are never fatal in lenient mode: the offending pairs are dropped and
/// the error is handed to a [`DiagnosticSink`](super::diagnostic::DiagnosticSink).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedEventError {
    /// A trailing key had no value
    #[error("Ignored key without a value: {key}")]
    OddArgumentCount { position: usize, key: Value },

    /// One or more pairs used a non-string key
    #[error("Ignored key-value pairs with non-string keys: {}", format_pairs(.pairs))]
    NonStringKeys { pairs: Vec<InvalidPair> },
}

fn format_pairs(pairs: &[InvalidPair]) -> String {
    pairs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("below threshold")]
    struct BelowThreshold;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("LevelFilter", "unknown level");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::writer("closed");
        assert!(matches!(err, LoggerError::WriterError(_)));
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("LoggerConfig", "missing format");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for LoggerConfig: missing format"
        );

        let squelch: SquelchError = Arc::new(BelowThreshold);
        let err = LoggerError::squelched(&squelch);
        assert_eq!(err.to_string(), "Log event squelched: below threshold");
    }

    #[test]
    fn test_malformed_display() {
        let err = MalformedEventError::NonStringKeys {
            pairs: vec![
                InvalidPair {
                    position: 0,
                    key: Value::I64(1),
                    value: Value::from("a"),
                },
                InvalidPair {
                    position: 4,
                    key: Value::Bool(true),
                    value: Value::I64(2),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Ignored key-value pairs with non-string keys: \
             {position=0 key=1 value=a}, {position=4 key=true value=2}"
        );

        let err: LoggerError = MalformedEventError::OddArgumentCount {
            position: 2,
            key: Value::from("dangling"),
        }
        .into();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("dangling"));
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing event", "cannot write to sink", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing event"));
    }
}

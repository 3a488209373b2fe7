//! Builder and configuration for a complete logger chain
//!
//! Assembles the usual stack, outermost first:
//!
//! ```text
//! Context(ts, caller) -> LevelInjector -> LevelFilter -> SyncLogger -> appender
//! ```
//!
//! Every stage except the appender is optional.

use super::error::{LoggerError, Result};
use super::level::{self, FilterOption};
use super::log_level::Level;
use super::logger::{Context, Logger};
use super::output_format::OutputFormat;
use super::sync::SyncLogger;
use super::timestamp::TimestampFormat;
use super::value::Value;
use super::valuer;
use crate::appenders::{JsonAppender, LogfmtAppender};
use chrono::format::{Item, StrftimeItems};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Key the builder binds timestamps to
pub const TIMESTAMP_KEY: &str = "ts";

/// Key the builder binds call sites to
pub const CALLER_KEY: &str = "caller";

/// Fluent builder for a [`Context`] over a filtered, leveled sink.
///
/// # Example
///
/// ```
/// use kvlog_facade::{keyvals, level, CaptureAppender, Level, Logger, LoggerBuilder};
/// use std::sync::Arc;
///
/// let capture = Arc::new(CaptureAppender::new());
/// let logger = LoggerBuilder::new()
///     .allow(Level::Warn)
///     .default_level(Level::Info)
///     .timestamp(None)
///     .build_with(capture.clone());
///
/// logger.log(&keyvals!["msg", "defaults to info, filtered"]).unwrap();
/// level::error(logger).log(&keyvals!["msg", "kept"]).unwrap();
/// assert_eq!(capture.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    format: OutputFormat,
    allow: Option<Level>,
    default_level: Option<Level>,
    squelch_no_level: bool,
    filter_options: Vec<FilterOption>,
    timestamp: Option<TimestampFormat>,
    caller: bool,
    synchronized: bool,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            format: OutputFormat::default(),
            allow: Some(Level::Info),
            default_level: None,
            squelch_no_level: false,
            filter_options: Vec::new(),
            timestamp: Some(TimestampFormat::default()),
            caller: false,
            synchronized: false,
        }
    }

    /// Builder preloaded from a deserialized configuration
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            format: config.format,
            allow: config.allow,
            default_level: config.default_level,
            squelch_no_level: config.squelch_no_level,
            filter_options: Vec::new(),
            timestamp: config.timestamp.clone(),
            caller: config.caller,
            synchronized: config.synchronized,
        })
    }

    /// Set the encoding used by [`build`](Self::build) and
    /// [`build_with_writer`](Self::build_with_writer)
    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Allow `level` and everything more severe
    #[must_use = "builder methods return a new value"]
    pub fn allow(mut self, level: Level) -> Self {
        self.allow = Some(level);
        self
    }

    /// Forward every event regardless of level
    #[must_use = "builder methods return a new value"]
    pub fn allow_all(mut self) -> Self {
        self.allow = None;
        self
    }

    /// Tag events that carry no level with `level`
    #[must_use = "builder methods return a new value"]
    pub fn default_level(mut self, level: Level) -> Self {
        self.default_level = Some(level);
        self
    }

    /// Squelch events that carry no level.
    ///
    /// Has no effect together with [`default_level`](Self::default_level),
    /// since every event then carries one.
    #[must_use = "builder methods return a new value"]
    pub fn squelch_no_level(mut self, squelch: bool) -> Self {
        self.squelch_no_level = squelch;
        self
    }

    /// Extra filter option applied after the ones above
    #[must_use = "builder methods return a new value"]
    pub fn filter_option(mut self, option: FilterOption) -> Self {
        self.filter_options.push(option);
        self
    }

    /// Bind a per-event timestamp under `ts`, or none
    #[must_use = "builder methods return a new value"]
    pub fn timestamp(mut self, format: Option<TimestampFormat>) -> Self {
        self.timestamp = format;
        self
    }

    /// Bind the logging call site under `caller`
    #[must_use = "builder methods return a new value"]
    pub fn caller(mut self, enabled: bool) -> Self {
        self.caller = enabled;
        self
    }

    /// Serialize calls into the sink with a lock
    #[must_use = "builder methods return a new value"]
    pub fn synchronized(mut self, enabled: bool) -> Self {
        self.synchronized = enabled;
        self
    }

    /// Build the chain over an arbitrary sink
    pub fn build_with<L: Logger + 'static>(self, sink: L) -> Context {
        if self.synchronized {
            self.wrap(SyncLogger::new(sink))
        } else {
            self.wrap(sink)
        }
    }

    /// Build the chain over a writer encoded with the configured format
    pub fn build_with_writer<W>(self, writer: W) -> Result<Context>
    where
        W: Send + Sync + 'static,
        for<'a> &'a W: Write,
    {
        match self.format {
            OutputFormat::Json => Ok(self.build_with(JsonAppender::new(writer))),
            OutputFormat::Logfmt => Ok(self.build_with(LogfmtAppender::new(writer))),
            OutputFormat::Text => Err(LoggerError::config(
                "format",
                "text output is only available on the console",
            )),
        }
    }

    /// Build the chain over stderr, or the console for text format
    pub fn build(self) -> Result<Context> {
        match self.format {
            #[cfg(feature = "console")]
            OutputFormat::Text => {
                Ok(self.build_with(crate::appenders::ConsoleAppender::new()))
            }
            _ => self.build_with_writer(std::io::stderr()),
        }
    }

    fn wrap<L: Logger + 'static>(self, sink: L) -> Context {
        let mut options = Vec::with_capacity(self.filter_options.len() + 2);
        options.push(match self.allow {
            Some(level) => FilterOption::Allow(level),
            None => FilterOption::AllowAll,
        });
        options.push(FilterOption::SquelchNoLevel(self.squelch_no_level));
        options.extend(self.filter_options);

        let filtered = level::new_filter(sink, options);
        let context = match self.default_level {
            Some(default) => Context::new(level::new_injector(filtered, default)),
            None => Context::new(filtered),
        };

        let mut bound = Vec::new();
        if let Some(format) = self.timestamp {
            bound.push(Value::from(TIMESTAMP_KEY));
            bound.push(Value::from(valuer::timestamp_format(Utc::now, format)));
        }
        if self.caller {
            bound.push(Value::from(CALLER_KEY));
            bound.push(Value::from(valuer::default_caller()));
        }
        context.with(bound)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable logger settings.
///
/// Missing fields take the [`LoggerBuilder::new`] defaults.
///
/// ```
/// use kvlog_facade::{Level, LoggerConfig, OutputFormat};
///
/// let config = LoggerConfig::from_json(r#"{"format": "json", "allow": "debug"}"#).unwrap();
/// assert_eq!(config.format, OutputFormat::Json);
/// assert_eq!(config.allow, Some(Level::Debug));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub format: OutputFormat,
    /// Least severe level forwarded; `null` forwards everything
    pub allow: Option<Level>,
    pub default_level: Option<Level>,
    pub squelch_no_level: bool,
    pub timestamp: Option<TimestampFormat>,
    pub caller: bool,
    pub synchronized: bool,
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(TimestampFormat::Custom(pattern)) = &self.timestamp {
            if pattern.trim().is_empty() {
                return Err(LoggerError::config(
                    "timestamp",
                    "custom format must not be empty",
                ));
            }
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "timestamp",
                    format!("invalid strftime pattern: {}", pattern),
                ));
            }
        }
        Ok(())
    }

    pub fn into_builder(self) -> Result<LoggerBuilder> {
        LoggerBuilder::from_config(&self)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let builder = LoggerBuilder::new();
        Self {
            format: builder.format,
            allow: builder.allow,
            default_level: builder.default_level,
            squelch_no_level: builder.squelch_no_level,
            timestamp: builder.timestamp,
            caller: builder.caller,
            synchronized: builder.synchronized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::CaptureAppender;
    use crate::core::sync::SyncWriter;
    use crate::keyvals;
    use std::sync::Arc;

    #[test]
    fn test_builder_defaults() {
        let capture = Arc::new(CaptureAppender::new());
        let logger = LoggerBuilder::new().build_with(capture.clone());

        level::debug(logger.clone()).log(&keyvals!["msg", "hidden"]).unwrap();
        level::info(logger.clone()).log(&keyvals!["msg", "shown"]).unwrap();
        logger.log(&keyvals!["msg", "untagged"]).unwrap();

        let events = capture.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0][0], Value::from(TIMESTAMP_KEY));
        assert!(matches!(events[0][1], Value::Str(_)));
        assert_eq!(level::find(&events[0]), Some(Level::Info));
    }

    #[test]
    fn test_injector_then_filter() {
        let capture = Arc::new(CaptureAppender::new());
        let logger = LoggerBuilder::new()
            .allow(Level::Warn)
            .default_level(Level::Warn)
            .timestamp(None)
            .build_with(capture.clone());

        logger.log(&keyvals!["msg", "defaulted"]).unwrap();
        assert_eq!(
            capture.events(),
            vec![keyvals![level::key(), Level::Warn, "msg", "defaulted"]]
        );
    }

    #[test]
    fn test_squelch_no_level() {
        let capture = Arc::new(CaptureAppender::new());
        let logger = LoggerBuilder::new()
            .allow_all()
            .squelch_no_level(true)
            .timestamp(None)
            .synchronized(true)
            .build_with(capture.clone());

        logger.log(&keyvals!["msg", "untagged"]).unwrap();
        level::trace(logger).log(&keyvals!["msg", "tagged"]).unwrap();
        assert_eq!(capture.len(), 1);
    }

    #[test]
    fn test_numeric_timestamp_and_caller() {
        let capture = Arc::new(CaptureAppender::new());
        let logger = LoggerBuilder::new()
            .allow_all()
            .timestamp(Some(TimestampFormat::UnixMillis))
            .caller(true)
            .build_with(capture.clone());

        logger.emit(&keyvals!["msg", "m"]).unwrap();
        let line = line!() - 1;

        let event = &capture.events()[0];
        assert!(matches!(event[1], Value::I64(ms) if ms > 0));
        assert_eq!(event[2], Value::from(CALLER_KEY));
        assert_eq!(event[3], Value::from(format!("builder.rs:{}", line)));
    }

    #[test]
    fn test_caller_on_level_helper_path() {
        let capture = Arc::new(CaptureAppender::new());
        let logger = LoggerBuilder::new()
            .timestamp(None)
            .caller(true)
            .build_with(capture.clone());

        level::info(logger.clone()).log(&keyvals!["msg", "m"]).unwrap();
        let line = line!() - 1;
        logger.log(&keyvals!["msg", "untagged"]).unwrap();
        let untagged_line = line!() - 1;

        let events = capture.events();
        assert_eq!(events[0][0], Value::from(CALLER_KEY));
        assert_eq!(events[0][1], Value::from(format!("builder.rs:{}", line)));
        assert_eq!(events[1][1], Value::from(format!("builder.rs:{}", untagged_line)));
    }

    #[test]
    fn test_build_with_writer_json() -> Result<()> {
        let writer = Arc::new(SyncWriter::new(Vec::new()));
        let logger = LoggerBuilder::new()
            .format(OutputFormat::Json)
            .timestamp(None)
            .build_with_writer(SharedWriter(Arc::clone(&writer)))?;

        level::info(logger).log(&keyvals!["msg", "hello"])?;
        let output = writer.lock().clone();
        let parsed: serde_json::Value = serde_json::from_slice(&output)?;
        assert_eq!(parsed["msg"], "hello");
        assert_eq!(parsed["level"], "info");
        Ok(())
    }

    #[test]
    fn test_text_needs_console() {
        let result = LoggerBuilder::new()
            .format(OutputFormat::Text)
            .build_with_writer(std::io::sink());
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config = LoggerConfig::from_json(
            r#"{
                "format": "logfmt",
                "allow": null,
                "default_level": "warn",
                "timestamp": {"custom": "%H:%M:%S"},
                "caller": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.allow, None);
        assert_eq!(config.default_level, Some(Level::Warn));
        assert_eq!(
            config.timestamp,
            Some(TimestampFormat::Custom("%H:%M:%S".to_string()))
        );
        assert!(config.caller);
        assert!(!config.synchronized);
        assert!(config.into_builder().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_input() {
        assert!(matches!(
            LoggerConfig::from_json(r#"{"timestamp": {"custom": " "}}"#),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            LoggerConfig::from_json(r#"{"timestamp": {"custom": "%Q"}}"#),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            LoggerConfig::from_json(r#"{"allow": "verbose"}"#),
            Err(LoggerError::JsonError(_))
        ));
        assert!(matches!(
            LoggerConfig::from_json(r#"{"colour": true}"#),
            Err(LoggerError::JsonError(_))
        ));
    }

    #[test]
    fn test_config_defaults_match_builder() {
        let config = LoggerConfig::from_json("{}").unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.allow, Some(Level::Info));
        assert_eq!(config.timestamp, Some(TimestampFormat::Iso8601));
    }

    struct SharedWriter(Arc<SyncWriter<Vec<u8>>>);

    impl Write for &SharedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            (&*self.0).write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            (&*self.0).flush()
        }
    }
}

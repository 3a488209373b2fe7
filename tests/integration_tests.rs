//! Integration tests for the logging facade
//!
//! These tests verify:
//! - The end-to-end context -> level -> filter -> sink path
//! - Level injection and filtering through the public API
//! - File-backed sinks and log injection prevention
//! - Sugared logging with diagnostics
//! - The process-wide default logger

use kvlog_facade::core::diagnostic;
use kvlog_facade::{
    args, keyvals, level, CaptureAppender, CollectingDiagnostics, Context, FilterOption, Level,
    Logger, LoggerBuilder, LoggerError, LogfmtAppender, MalformedEventError, OutputFormat,
    SugaredLogger, SweetenMode, SwapLogger, SyncWriter, TimestampFormat, Value,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn pool_event(capture: &Arc<CaptureAppender>, allow: FilterOption) {
    let filtered = level::new_filter(capture.clone(), [allow]);
    let ctx = Context::new(filtered).with(keyvals!["rname", "testPool1"]);
    level::info(ctx)
        .log(&keyvals!["attempt", 3, "backoff", "1s"])
        .expect("log failed");
}

#[test]
fn test_end_to_end_allow_info() {
    let capture = Arc::new(CaptureAppender::new());
    pool_event(&capture, FilterOption::AllowInfo);

    let events = capture.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0],
        keyvals![
            "rname", "testPool1",
            level::key(), Level::Info,
            "attempt", 3,
            "backoff", "1s"
        ]
    );
    // five fields: context, level tag, then call-site fields
    assert_eq!(events[0].len() / 2, 5);
}

#[test]
fn test_end_to_end_allow_error_squelches() {
    let capture = Arc::new(CaptureAppender::new());
    pool_event(&capture, FilterOption::AllowError);
    assert!(capture.is_empty());
}

#[test]
fn test_filter_allow_warn_matrix() {
    let capture = Arc::new(CaptureAppender::new());
    let filter = level::new_filter(
        capture.clone(),
        [FilterOption::AllowWarn, FilterOption::SquelchNoLevel(true)],
    );
    let logger = Context::new(filter);

    level::warn(logger.clone()).log(&keyvals!["n", 1]).unwrap();
    level::error(logger.clone()).log(&keyvals!["n", 2]).unwrap();
    level::info(logger.clone()).log(&keyvals!["n", 3]).unwrap();
    level::debug(logger.clone()).log(&keyvals!["n", 4]).unwrap();
    logger.log(&keyvals!["n", 5]).unwrap();

    let kept: Vec<_> = capture.events().iter().map(|e| e[3].clone()).collect();
    assert_eq!(kept, vec![Value::from(1), Value::from(2)]);
}

#[test]
fn test_injector_does_not_overwrite() {
    let capture = Arc::new(CaptureAppender::new());
    let injected = level::new_injector(capture.clone(), Level::Info);
    level::error(injected).log(&keyvals!["msg", "boom"]).unwrap();

    let event = &capture.events()[0];
    assert_eq!(level::find(event), Some(Level::Error));
    assert_eq!(event.iter().filter(|v| v.is_level_key()).count(), 1);
}

#[derive(Debug, thiserror::Error)]
#[error("below configured level")]
struct BelowLevel;

#[test]
fn test_squelch_error_visible_to_caller() {
    let capture = Arc::new(CaptureAppender::new());
    let logger = LoggerBuilder::new()
        .allow(Level::Error)
        .timestamp(None)
        .filter_option(FilterOption::err_not_allowed(BelowLevel))
        .build_with(capture.clone());

    let err = level::info(logger).log(&keyvals!["msg", "m"]).unwrap_err();
    assert!(matches!(err, LoggerError::Squelched(_)));
    assert!(err.to_string().contains("below configured level"));
}

#[test]
fn test_log_injection_prevention() {
    // Newlines in values must not start a new logfmt line
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");

    let appender = LogfmtAppender::open(&log_file).expect("Failed to create appender");
    let logger = LoggerBuilder::new()
        .timestamp(None)
        .build_with(appender);

    let malicious = "User login\nlevel=error msg=\"Fake error injected\"";
    level::info(logger.clone())
        .log(&keyvals!["msg", malicious])
        .expect("log failed");
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("\\nlevel=error"));
}

#[test]
fn test_json_file_sink_with_timestamp() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("events.jsonl");
    let file = fs::File::create(&log_file).expect("Failed to create file");

    let logger = LoggerBuilder::new()
        .format(OutputFormat::Json)
        .timestamp(Some(TimestampFormat::Unix))
        .synchronized(true)
        .build_with_writer(SyncWriter::new(file))
        .expect("Failed to build logger");

    for i in 0..3 {
        level::warn(logger.clone())
            .log(&keyvals!["msg", "disk", "i", i])
            .expect("log failed");
    }
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    for (i, line) in lines.iter().enumerate() {
        let parsed: serde_json::Value = serde_json::from_str(line).expect("invalid JSON");
        assert_eq!(parsed["level"], "warn");
        assert_eq!(parsed["i"], i);
        assert!(parsed["ts"].is_i64());
    }
}

#[test]
fn test_sugared_logging_with_diagnostics() {
    let capture = Arc::new(CaptureAppender::new());
    let diagnostics = Arc::new(CollectingDiagnostics::new());
    let logger = LoggerBuilder::new()
        .allow(Level::Debug)
        .timestamp(None)
        .build_with(capture.clone());

    let sugar = SugaredLogger::builder(logger)
        .diagnostics(diagnostics.clone())
        .build()
        .with(args!["rname", "testPool1"])
        .expect("lenient with never fails");

    sugar.infow("retrying", args!["attempt", 3, 42, "bad", 43, "worse"]);
    sugar.tracef(format_args!("filtered {}", 1));
    sugar.debug("orphan follows");
    sugar.debugw("m", args!["orphan"]);

    let events = capture.events();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[0],
        keyvals![
            "rname", "testPool1",
            level::key(), Level::Info,
            "msg", "retrying",
            "attempt", 3
        ]
    );

    let reports = diagnostics.reports();
    assert_eq!(reports.len(), 2);
    match &reports[0] {
        MalformedEventError::NonStringKeys { pairs } => {
            assert_eq!(pairs.len(), 2);
            assert_eq!(pairs[0].position, 2);
            assert_eq!(pairs[1].position, 4);
        }
        other => panic!("unexpected diagnostic: {other}"),
    }
    assert!(matches!(
        reports[1],
        MalformedEventError::OddArgumentCount { position: 0, .. }
    ));
}

#[test]
fn test_strict_sugared_logger_fails_whole_call() {
    let capture = Arc::new(CaptureAppender::new());
    let sugar = SugaredLogger::builder(capture.clone())
        .mode(SweetenMode::Strict)
        .build();

    let err = sugar
        .log_at(Level::Warn, "m", args!["a", 1, Value::from(2), "b"])
        .unwrap_err();
    assert!(matches!(
        err,
        LoggerError::MalformedEvent(MalformedEventError::NonStringKeys { .. })
    ));
    assert!(capture.is_empty());
}

#[test]
fn test_context_dangling_key_reported_process_wide() {
    let diagnostics = Arc::new(CollectingDiagnostics::new());
    diagnostic::set_sink(diagnostics.clone());

    let capture = Arc::new(CaptureAppender::new());
    let ctx = Context::new(capture.clone()).with(keyvals!["a", 1, "dangling"]);
    ctx.log(&[]).unwrap();

    assert_eq!(capture.events()[0], keyvals!["a", 1]);
    assert!(diagnostics
        .reports()
        .iter()
        .any(|r| matches!(r, MalformedEventError::OddArgumentCount { position: 2, .. })));
}

#[test]
fn test_swap_backend_behind_context() {
    let first = Arc::new(CaptureAppender::new());
    let second = Arc::new(CaptureAppender::new());
    let swap = Arc::new(SwapLogger::new());

    let ctx = Context::new(swap.clone()).with(keyvals!["svc", "api"]);
    ctx.log(&keyvals!["n", 0]).unwrap();

    swap.swap_arc(first.clone());
    ctx.log(&keyvals!["n", 1]).unwrap();
    swap.swap_arc(second.clone());
    ctx.log(&keyvals!["n", 2]).unwrap();

    assert_eq!(first.events(), vec![keyvals!["svc", "api", "n", 1]]);
    assert_eq!(second.events(), vec![keyvals!["svc", "api", "n", 2]]);
}

#[test]
fn test_global_logger_lifecycle() {
    use kvlog_facade::global;

    // before init: silent no-op
    assert!(global::log(&keyvals!["msg", "early"]).is_ok());

    let capture = Arc::new(CaptureAppender::new());
    global::init(capture.clone()).expect("first init succeeds");
    assert!(global::is_initialized());
    assert!(matches!(
        global::init(capture.clone()),
        Err(LoggerError::AlreadyInitialized)
    ));

    global::log(&keyvals!["msg", "hello"]).unwrap();
    global::flush().unwrap();
    global::shutdown();
    global::log(&keyvals!["msg", "after"]).unwrap();

    assert_eq!(capture.events(), vec![keyvals!["msg", "hello"]]);
}

#[cfg(unix)]
#[test]
fn test_sync_writer_exposes_file_descriptor() {
    use std::os::unix::io::AsRawFd;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file = fs::File::create(temp_dir.path().join("fd.log")).expect("Failed to create file");
    let fd = file.as_raw_fd();

    let writer = SyncWriter::new(file);
    assert_eq!(writer.as_raw_fd(), fd);
}

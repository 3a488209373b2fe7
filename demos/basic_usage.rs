//! Basic logger usage example
//!
//! Demonstrates building a leveled logger, attaching context, the sugared
//! API, and hot-swapping the backend.
//!
//! Run with: cargo run --example basic_usage

use kvlog_facade::prelude::*;
use kvlog_facade::{args, keyvals, level};
use std::io;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== kvlog_facade - Basic Usage Example ===\n");

    // Colored text on the console, everything from debug up
    let console = LoggerBuilder::new()
        .format(OutputFormat::Text)
        .allow(Level::Debug)
        .build()?;

    println!("1. Logging at different levels:");
    level::trace(console.clone()).log(&keyvals!["msg", "This is a trace message (hidden)"])?;
    level::debug(console.clone()).log(&keyvals!["msg", "This is a debug message"])?;
    level::info(console.clone()).log(&keyvals!["msg", "This is an info message"])?;
    level::warn(console.clone()).log(&keyvals!["msg", "This is a warning message"])?;
    level::error(console.clone()).log(&keyvals!["msg", "This is an error message"])?;

    println!("\n2. Context fields:");
    let pool = console.with(keyvals!["rname", "testPool1"]);
    level::info(pool.clone()).log(&keyvals!["attempt", 3, "backoff", "1s"])?;

    println!("\n3. Sugared logging:");
    let sugar = SugaredLogger::from_context(pool);
    sugar.info("connection established");
    sugar.warnf(format_args!("pool at {}% capacity", 85));
    sugar.infow("retrying", args!["attempt", 4, "backoff", "2s"]);

    println!("\n4. JSON on stderr, swapped in at runtime:");
    let swap = Arc::new(SwapLogger::with_logger(console));
    let app = Context::from_arc(swap.clone()).with(keyvals!["svc", "demo"]);
    level::info(app.clone()).log(&keyvals!["msg", "via console"])?;

    let json = LoggerBuilder::new()
        .format(OutputFormat::Json)
        .timestamp(None)
        .build_with_writer(SyncWriter::new(io::stderr()))?;
    swap.swap(json);
    level::info(app).log(&keyvals!["msg", "via json"])?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

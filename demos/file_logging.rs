//! File logging example
//!
//! Demonstrates sending records to a buffered file instead of stdout.
//!
//! Run with: cargo run --example file_logging

use ctxlog::prelude::*;
use std::fs::OpenOptions;
use std::io::BufWriter;

fn main() -> Result<()> {
    println!("=== ctxlog - File Logging Example ===\n");

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("application.jsonl")?;

    let logger = Logger::builder()
        .output(BufWriter::new(file))
        .level(LogLevel::Debug)
        .attr("logger", "file_logging")
        .attr("pid", std::process::id())
        .build();

    println!("1. Logging application startup:");
    let ctx = Context::background().append("phase", "startup");
    logger.info_ctx(&ctx, "Application started")?;
    logger.debug_ctx(&ctx, "Loading configuration...")?;
    logger.warn_ctx(&ctx, "Using default settings for some options")?;

    println!("2. Performing some operations:");
    let ctx = Context::background().append("phase", "work");
    for i in 1..=5 {
        let item = ctx.append("item", i);
        logger.info_ctx(&item, format!("Processing item {}/5", i))?;
        if i == 3 {
            logger.warn_ctx(&item, "Item took longer than expected")?;
        }
    }

    // Buffered output: flush before exiting
    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.jsonl' for the full log output");

    Ok(())
}

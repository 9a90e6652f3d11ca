//! Basic logger usage example
//!
//! Demonstrates the JSON output and how the minimum level filters records.
//!
//! Run with: cargo run --example basic_usage

use ctxlog::prelude::*;

fn main() -> Result<()> {
    println!("=== ctxlog - Basic Usage Example ===\n");

    // Writes to stdout by default
    let logger = Logger::builder()
        .level(LogLevel::Trace)
        .attr("logger", "basic_usage")
        .build();

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warn("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.fatal("This is a fatal message")?;

    println!("\n2. Logging with the default minimum level (info):");
    let logger = Logger::builder().source(false).build();
    logger.trace("Trace message (hidden)")?;
    logger.debug("Debug message (hidden)")?;
    logger.info("Info message (visible)")?;
    logger.warn("Warning message (visible)")?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

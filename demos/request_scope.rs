//! Request-scoped attributes example
//!
//! Each layer of a request adds what it knows to the context; every record
//! emitted further down carries all of it without the layers knowing about
//! each other.
//!
//! Run with: cargo run --example request_scope

use ctxlog::prelude::*;
use ctxlog::{info, warn};

fn handle_request(logger: &Logger, request_id: &str, user_id: i64) -> Result<()> {
    let ctx = ctxlog::append(None, "request_id", request_id);
    info!(logger, ctx, "request received")?;

    let ctx = ctx.append("user_id", user_id);
    authorize(logger, &ctx)?;
    load_orders(logger, &ctx)
}

fn authorize(logger: &Logger, ctx: &Context) -> Result<()> {
    let ctx = ctx.append("step", "authorize");
    info!(logger, ctx, "user authorized")
}

fn load_orders(logger: &Logger, ctx: &Context) -> Result<()> {
    let ctx = ctx.append("step", "load_orders");
    let count = 3;
    if count > 2 {
        warn!(logger, ctx, "large order list: {} orders", count)?;
    }
    logger.log_attrs(&ctx, LogLevel::Info, "orders loaded", [Attr::new("count", count)])
}

fn main() -> Result<()> {
    let logger = Logger::builder().attr("logger", "svc").build();

    handle_request(&logger, "abc", 42)?;
    handle_request(&logger, "def", 7)?;

    Ok(())
}

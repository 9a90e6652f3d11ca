//! # ctxlog
//!
//! Structured JSON logging with request-scoped attributes.
//!
//! ## Features
//!
//! - **JSON Records**: One object per line, with `message` and a lower-case `severity`
//! - **Context Attributes**: Attach key/value pairs to a [`Context`] once and
//!   have them written on every record emitted with it
//! - **Thread Safe**: Contexts are immutable and loggers can be shared freely
//! - **Easy to Use**: A builder with sensible defaults
//!
//! ```
//! use ctxlog::prelude::*;
//!
//! let logger = Logger::builder()
//!     .output(std::io::sink())
//!     .attr("logger", "svc")
//!     .build();
//!
//! let ctx = ctxlog::append(None, "request_id", "abc");
//! logger.info_ctx(&ctx, "started").unwrap();
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Attr, AttrValue, Context, Handler, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerOptions, Record, Result, Source,
    };
    pub use crate::handlers::{ContextHandler, HandlerOptions, JsonHandler};
}

pub use crate::core::{
    append, attrs, build_logger, Attr, AttrValue, Context, Fields, Handler, LogLevel, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerOptions, Record, Result, Source,
    MESSAGE_FIELD, SEVERITY_FIELD,
};
pub use crate::handlers::{ContextHandler, HandlerOptions, JsonHandler};

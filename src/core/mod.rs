//! Core logger types and traits

pub mod attr;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod log_level;
pub mod logger;
pub mod record;

pub use attr::{Attr, AttrValue, Fields};
pub use config::LoggerConfig;
pub use context::{append, attrs, Context};
pub use error::{LoggerError, Result};
pub use handler::Handler;
pub use log_level::LogLevel;
pub use logger::{build_logger, Logger, LoggerBuilder, LoggerOptions, MESSAGE_FIELD, SEVERITY_FIELD};
pub use record::{Record, Source};

//! Handler implementations

pub mod context;
pub mod json;

pub use context::ContextHandler;
pub use json::{HandlerOptions, JsonHandler, ReplaceAttr};

// Re-export the trait next to its implementations
pub use crate::core::Handler;

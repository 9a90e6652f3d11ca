//! Handler trait for record sinks

use super::{attr::Attr, context::Context, error::Result, log_level::LogLevel, record::Record};
use std::sync::Arc;

/// Destination for log records
///
/// Handlers are shared between loggers and threads, so every method takes
/// `&self`; implementations guard their own mutable state.
pub trait Handler: Send + Sync {
    /// Whether a record at `level` would be handled at all
    ///
    /// Loggers consult this before building a record.
    fn enabled(&self, level: LogLevel) -> bool;

    /// Handle one record emitted with `ctx`
    fn handle(&self, ctx: &Context, record: Record) -> Result<()>;

    /// A handler that behaves like this one with `attrs` attached to every record
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    fn flush(&self) -> Result<()>;

    fn name(&self) -> &str;
}

//! Main logger implementation

use super::{
    attr::{Attr, AttrValue},
    context::Context,
    error::Result,
    handler::Handler,
    log_level::LogLevel,
    record::{Record, Source},
};
use crate::handlers::json::{LEVEL_KEY, MESSAGE_KEY};
use crate::handlers::{ContextHandler, HandlerOptions, JsonHandler};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Key under which the built logger writes the message
pub const MESSAGE_FIELD: &str = "message";
/// Key under which the built logger writes the lower-case level
pub const SEVERITY_FIELD: &str = "severity";

/// Front end for emitting records through a [`Handler`]
///
/// Cheap to clone; clones share the handler and its sink. Every emit method
/// returns the sink's error, if any, to the caller.
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use ctxlog::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .output(std::io::sink())
    ///     .level(LogLevel::Debug)
    ///     .attr("logger", "svc")
    ///     .build();
    /// assert!(logger.enabled(LogLevel::Debug));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Whether a record at `level` would be written
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.handler.enabled(level)
    }

    /// A logger that adds `attrs` to every record, sharing this logger's sink
    #[must_use]
    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Logger {
        let attrs: Vec<Attr> = attrs.into_iter().collect();
        if attrs.is_empty() {
            return self.clone();
        }
        Logger::new(self.handler.with_attrs(attrs))
    }

    /// Emit a fully built record
    pub fn log_record(&self, ctx: &Context, record: Record) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }
        self.handler.handle(ctx, record)
    }

    #[track_caller]
    pub fn log(&self, ctx: &Context, level: LogLevel, message: impl Into<String>) -> Result<()> {
        self.log_attrs(ctx, level, message, Vec::new())
    }

    /// Emit a record carrying call-site attributes
    #[track_caller]
    pub fn log_attrs(
        &self,
        ctx: &Context,
        level: LogLevel,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }

        let record = Record::new(level, message)
            .with_source(Source::caller())
            .with_attrs(attrs);
        self.handler.handle(ctx, record)
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) -> Result<()> {
        self.log(&Context::background(), LogLevel::Trace, message)
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(&Context::background(), LogLevel::Debug, message)
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(&Context::background(), LogLevel::Info, message)
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.log(&Context::background(), LogLevel::Warn, message)
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(&Context::background(), LogLevel::Error, message)
    }

    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> Result<()> {
        self.log(&Context::background(), LogLevel::Fatal, message)
    }

    #[inline]
    #[track_caller]
    pub fn trace_ctx(&self, ctx: &Context, message: impl Into<String>) -> Result<()> {
        self.log(ctx, LogLevel::Trace, message)
    }

    #[inline]
    #[track_caller]
    pub fn debug_ctx(&self, ctx: &Context, message: impl Into<String>) -> Result<()> {
        self.log(ctx, LogLevel::Debug, message)
    }

    #[inline]
    #[track_caller]
    pub fn info_ctx(&self, ctx: &Context, message: impl Into<String>) -> Result<()> {
        self.log(ctx, LogLevel::Info, message)
    }

    #[inline]
    #[track_caller]
    pub fn warn_ctx(&self, ctx: &Context, message: impl Into<String>) -> Result<()> {
        self.log(ctx, LogLevel::Warn, message)
    }

    #[inline]
    #[track_caller]
    pub fn error_ctx(&self, ctx: &Context, message: impl Into<String>) -> Result<()> {
        self.log(ctx, LogLevel::Error, message)
    }

    #[inline]
    #[track_caller]
    pub fn fatal_ctx(&self, ctx: &Context, message: impl Into<String>) -> Result<()> {
        self.log(ctx, LogLevel::Fatal, message)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("handler", &self.handler.name())
            .finish()
    }
}

/// Settings for [`build_logger`]
pub struct LoggerOptions {
    /// Where records are written
    pub output: Box<dyn Write + Send>,
    /// Records below this level are dropped before formatting
    pub level: LogLevel,
    /// Annotate records with the file and line of the logging call
    pub source: bool,
    /// Attributes attached to every record
    pub attrs: Vec<Attr>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            output: Box::new(std::io::stdout()),
            level: LogLevel::Info,
            source: true,
            attrs: Vec::new(),
        }
    }
}

impl fmt::Debug for LoggerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerOptions")
            .field("level", &self.level)
            .field("source", &self.source)
            .field("attrs", &self.attrs)
            .finish_non_exhaustive()
    }
}

/// Build a JSON logger that merges context attributes into every record
///
/// The message is written under `message` and the level under `severity`,
/// lower-cased. Construction never fails; a broken output surfaces on the
/// first write.
pub fn build_logger(options: LoggerOptions) -> Logger {
    let handler_options = HandlerOptions::default()
        .with_level(options.level)
        .with_source(options.source)
        .with_replace_attr(rename_builtin);

    let json = JsonHandler::new(options.output, handler_options);
    let json: Arc<dyn Handler> = if options.attrs.is_empty() {
        Arc::new(json)
    } else {
        json.with_attrs(options.attrs)
    };

    Logger::new(Arc::new(ContextHandler::new(json)))
}

fn rename_builtin(mut attr: Attr) -> Attr {
    if attr.key == MESSAGE_KEY {
        attr.key = MESSAGE_FIELD.to_string();
    } else if attr.key == LEVEL_KEY {
        attr.key = SEVERITY_FIELD.to_string();
        if let AttrValue::String(ref mut level) = attr.value {
            *level = level.to_lowercase();
        }
    }
    attr
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use ctxlog::prelude::*;
///
/// let logger = Logger::builder()
///     .output(std::io::sink())
///     .level(LogLevel::Warn)
///     .source(false)
///     .attrs([Attr::new("service", "billing"), Attr::new("version", 3)])
///     .build();
/// assert!(!logger.enabled(LogLevel::Info));
/// ```
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    options: LoggerOptions,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            options: LoggerOptions::default(),
        }
    }

    /// Set the output sink (default: standard output)
    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, output: W) -> Self {
        self.options.output = Box::new(output);
        self
    }

    /// Set minimum log level (default: `Info`)
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.options.level = level;
        self
    }

    /// Enable or disable the `source` field (default: enabled)
    #[must_use = "builder methods return a new value"]
    pub fn source(mut self, enabled: bool) -> Self {
        self.options.source = enabled;
        self
    }

    /// Replace the static attributes
    #[must_use = "builder methods return a new value"]
    pub fn attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.options.attrs = attrs.into_iter().collect();
        self
    }

    /// Add one static attribute
    #[must_use = "builder methods return a new value"]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.options.attrs.push(Attr::new(key, value));
        self
    }

    /// The options collected so far
    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        build_logger(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_builder_defaults() {
        let builder = LoggerBuilder::default();
        assert_eq!(builder.options().level, LogLevel::Info);
        assert!(builder.options().source);
        assert!(builder.options().attrs.is_empty());

        let logger = builder.build();
        assert!(logger.enabled(LogLevel::Info));
        assert!(!logger.enabled(LogLevel::Debug));
        assert_eq!(logger.handler().name(), "context");
    }

    #[test]
    fn test_fields_are_renamed() -> Result<()> {
        let buf = Buffer::default();
        let logger = Logger::builder().output(buf.clone()).build();

        logger.error("failed")?;

        let output = buf.contents();
        assert!(output.contains(r#""message":"failed""#));
        assert!(output.contains(r#""severity":"error""#));
        assert!(!output.contains(r#""msg""#));
        assert!(!output.contains(r#""level""#));
        Ok(())
    }

    #[test]
    fn test_disabled_level_writes_nothing() -> Result<()> {
        let buf = Buffer::default();
        let logger = Logger::builder().output(buf.clone()).build();

        logger.debug("hidden")?;
        logger.trace("hidden")?;

        assert!(buf.contents().is_empty());
        Ok(())
    }

    #[test]
    fn test_source_points_at_caller() -> Result<()> {
        let buf = Buffer::default();
        let logger = Logger::builder().output(buf.clone()).build();

        let line = line!() + 1;
        logger.info("located")?;

        let value: serde_json::Value = serde_json::from_str(buf.contents().trim())?;
        assert!(value["source"]["file"].as_str().unwrap().ends_with("logger.rs"));
        assert_eq!(value["source"]["line"], line);
        Ok(())
    }

    #[test]
    fn test_source_can_be_disabled() -> Result<()> {
        let buf = Buffer::default();
        let logger = Logger::builder().output(buf.clone()).source(false).build();

        logger.info("unlocated")?;
        assert!(!buf.contents().contains("\"source\""));
        Ok(())
    }

    #[test]
    fn test_with_adds_attrs_without_touching_parent() -> Result<()> {
        let buf = Buffer::default();
        let logger = Logger::builder()
            .output(buf.clone())
            .attr("logger", "svc")
            .build();
        let child = logger.with([Attr::new("component", "db")]);

        logger.info("parent")?;
        child.info("child")?;

        let contents = buf.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""logger":"svc""#));
        assert!(!lines[0].contains("component"));
        assert!(lines[1].contains(r#""logger":"svc""#));
        assert!(lines[1].contains(r#""component":"db""#));
        Ok(())
    }

    #[test]
    fn test_call_site_attrs_follow_context_attrs() -> Result<()> {
        let buf = Buffer::default();
        let logger = Logger::builder()
            .output(buf.clone())
            .source(false)
            .attr("logger", "svc")
            .build();

        let ctx = crate::append(None, "request_id", "abc");
        logger.log_attrs(&ctx, LogLevel::Info, "ordered", [Attr::new("attempt", 2)])?;

        let output = buf.contents();
        let logger_pos = output.find("\"logger\"").unwrap();
        let request_pos = output.find("\"request_id\"").unwrap();
        let attempt_pos = output.find("\"attempt\"").unwrap();
        assert!(logger_pos < request_pos && request_pos < attempt_pos);
        Ok(())
    }

    #[test]
    fn test_rename_only_touches_builtins() {
        let attr = rename_builtin(Attr::new("level", "WARN"));
        assert_eq!(attr, Attr::new("severity", "warn"));

        let attr = rename_builtin(Attr::new("time", "t"));
        assert_eq!(attr.key, "time");
    }
}

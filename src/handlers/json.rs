//! JSON handler for structured logging

use crate::core::{Attr, Context, Handler, LogLevel, Record, Result};
use chrono::SecondsFormat;
use parking_lot::Mutex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::Write;
use std::sync::Arc;

/// Key of the built-in timestamp field
pub const TIME_KEY: &str = "time";
/// Key of the built-in level field
pub const LEVEL_KEY: &str = "level";
/// Key of the built-in message field
pub const MESSAGE_KEY: &str = "msg";
/// Key of the built-in source location field
pub const SOURCE_KEY: &str = "source";

/// Rewrites a built-in field before it is written
///
/// Returning an attribute with an empty key drops the field.
pub type ReplaceAttr = Arc<dyn Fn(Attr) -> Attr + Send + Sync>;

/// Options for [`JsonHandler`]
#[derive(Clone, Default)]
pub struct HandlerOptions {
    /// Minimum level written; lower records are discarded
    pub level: LogLevel,
    /// Write the `source` field for records that carry a call site
    pub add_source: bool,
    pub replace_attr: Option<ReplaceAttr>,
}

impl HandlerOptions {
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    #[must_use]
    pub fn with_replace_attr<F>(mut self, replace: F) -> Self
    where
        F: Fn(Attr) -> Attr + Send + Sync + 'static,
    {
        self.replace_attr = Some(Arc::new(replace));
        self
    }
}

/// Output stream shared by a handler and everything derived from it
struct Sink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Drop for Sink {
    fn drop(&mut self) {
        // Push out anything a buffered writer still holds
        let _ = self.writer.get_mut().flush();
    }
}

/// Handler writing each record as a single-line JSON object (JSONL)
///
/// Fields are written in this order: `time`, `level`, `source` (when
/// enabled), `msg`, handler attributes, record attributes. Duplicate keys are
/// written as they come.
pub struct JsonHandler {
    sink: Arc<Sink>,
    options: HandlerOptions,
    attrs: Arc<[Attr]>,
}

impl JsonHandler {
    pub fn new<W: Write + Send + 'static>(writer: W, options: HandlerOptions) -> Self {
        Self {
            sink: Arc::new(Sink {
                writer: Mutex::new(Box::new(writer)),
            }),
            options,
            attrs: Arc::from(Vec::new()),
        }
    }

    /// Handler writing to the process standard output
    pub fn stdout(options: HandlerOptions) -> Self {
        Self::new(std::io::stdout(), options)
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    /// Attributes attached to every record
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    fn derive(&self, attrs: Vec<Attr>) -> JsonHandler {
        let mut combined = Vec::with_capacity(self.attrs.len() + attrs.len());
        combined.extend(self.attrs.iter().cloned());
        combined.extend(attrs);

        JsonHandler {
            sink: Arc::clone(&self.sink),
            options: self.options.clone(),
            attrs: Arc::from(combined),
        }
    }

    fn builtin(&self, attr: Attr) -> Option<Attr> {
        let attr = match self.options.replace_attr {
            Some(ref replace) => replace(attr),
            None => attr,
        };
        (!attr.is_empty()).then_some(attr)
    }

    /// Serialize `record` into one newline-terminated line
    pub fn format(&self, record: &Record) -> Result<Vec<u8>> {
        let mut builtins = Vec::with_capacity(4);
        builtins.extend(self.builtin(Attr::new(
            TIME_KEY,
            record.time.to_rfc3339_opts(SecondsFormat::Millis, true),
        )));
        builtins.extend(self.builtin(Attr::new(LEVEL_KEY, record.level.to_str())));
        if self.options.add_source {
            if let Some(ref source) = record.source {
                builtins.extend(self.builtin(Attr::new(SOURCE_KEY, source.to_value())));
            }
        }
        builtins.extend(self.builtin(Attr::new(MESSAGE_KEY, record.message.as_str())));

        let line = Line([builtins.as_slice(), &self.attrs[..], record.attrs.as_slice()]);
        let mut buf = Vec::with_capacity(256);
        serde_json::to_writer(&mut buf, &line)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl Handler for JsonHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.options.level
    }

    fn handle(&self, _ctx: &Context, record: Record) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }

        let buf = self.format(&record)?;
        // One write per record keeps concurrent lines from interleaving
        self.sink.writer.lock().write_all(&buf)?;
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(self.derive(attrs))
    }

    fn flush(&self) -> Result<()> {
        self.sink.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Top-level object of one record, built from consecutive attribute runs
struct Line<'a>([&'a [Attr]; 3]);

impl Serialize for Line<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for attr in self.0.iter().flat_map(|run| run.iter()) {
            if attr.is_empty() {
                continue;
            }
            map.serialize_entry(&attr.key, &attr.value)?;
        }
        map.end()
    }
}

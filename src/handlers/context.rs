//! Handler that merges context attributes into records

use crate::core::{Attr, Context, Handler, LogLevel, Record, Result};
use std::sync::Arc;

/// Decorates another handler with the attributes carried by the context
///
/// Each record is given the attributes appended to its context before it
/// is forwarded. They are placed after the wrapped handler's own attributes
/// and ahead of the ones attached at the call site, in append order.
/// Everything else, including errors, is the wrapped handler's business.
///
/// # Example
///
/// ```
/// use ctxlog::prelude::*;
/// use ctxlog::handlers::{ContextHandler, HandlerOptions, JsonHandler};
/// use std::sync::Arc;
///
/// let json = JsonHandler::new(std::io::sink(), HandlerOptions::default());
/// let logger = Logger::new(Arc::new(ContextHandler::new(Arc::new(json))));
///
/// let ctx = ctxlog::append(None, "request_id", "abc");
/// logger.info_ctx(&ctx, "started").unwrap();
/// ```
#[derive(Clone)]
pub struct ContextHandler {
    inner: Arc<dyn Handler>,
}

impl ContextHandler {
    pub fn new(inner: Arc<dyn Handler>) -> Self {
        Self { inner }
    }

    /// The wrapped handler
    pub fn inner(&self) -> &Arc<dyn Handler> {
        &self.inner
    }
}

impl Handler for ContextHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        self.inner.enabled(level)
    }

    fn handle(&self, ctx: &Context, mut record: Record) -> Result<()> {
        if ctx.attr_count() > 0 {
            record.prepend_attrs(ctx.attrs());
        }
        self.inner.handle(ctx, record)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(ContextHandler::new(self.inner.with_attrs(attrs)))
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        "context"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;
    use parking_lot::Mutex;

    /// Collects the records it receives
    #[derive(Default)]
    struct Recorder {
        records: Mutex<Vec<Record>>,
        fail: bool,
    }

    impl Handler for Recorder {
        fn enabled(&self, level: LogLevel) -> bool {
            level >= LogLevel::Info
        }

        fn handle(&self, _ctx: &Context, record: Record) -> Result<()> {
            if self.fail {
                return Err(std::io::Error::other("sink closed").into());
            }
            self.records.lock().push(record);
            Ok(())
        }

        fn with_attrs(&self, _attrs: Vec<Attr>) -> Arc<dyn Handler> {
            Arc::new(Recorder::default())
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "recorder"
        }
    }

    fn keys(record: &Record) -> Vec<&str> {
        record.attrs.iter().map(|a| a.key.as_str()).collect()
    }

    #[test]
    fn test_context_attrs_are_merged() -> Result<()> {
        let recorder = Arc::new(Recorder::default());
        let handler = ContextHandler::new(recorder.clone());

        let ctx = crate::append(None, "request_id", "abc").append("user", 7);
        let record = Record::new(LogLevel::Info, "hi").with_attrs(vec![Attr::new("call_site", true)]);
        handler.handle(&ctx, record)?;

        let records = recorder.records.lock();
        assert_eq!(keys(&records[0]), vec!["request_id", "user", "call_site"]);
        Ok(())
    }

    #[test]
    fn test_empty_context_forwards_unaltered() -> Result<()> {
        let recorder = Arc::new(Recorder::default());
        let handler = ContextHandler::new(recorder.clone());

        let record = Record::new(LogLevel::Info, "hi").with_attrs(vec![Attr::new("only", 1)]);
        handler.handle(&Context::background(), record)?;

        let records = recorder.records.lock();
        assert_eq!(keys(&records[0]), vec!["only"]);
        assert_eq!(records[0].message, "hi");
        Ok(())
    }

    #[test]
    fn test_errors_propagate() {
        let handler = ContextHandler::new(Arc::new(Recorder {
            fail: true,
            ..Default::default()
        }));

        let ctx = crate::append(None, "k", "v");
        let err = handler
            .handle(&ctx, Record::new(LogLevel::Error, "boom"))
            .unwrap_err();
        assert!(matches!(err, LoggerError::IoError(_)));
    }

    #[test]
    fn test_delegates_enabled() {
        let handler = ContextHandler::new(Arc::new(Recorder::default()));
        assert!(!handler.enabled(LogLevel::Debug));
        assert!(handler.enabled(LogLevel::Warn));
        assert_eq!(handler.name(), "context");
    }
}

//! Logging macros for ergonomic log message formatting.
//!
//! Every macro takes the logger, then the context, then `format!`-style
//! arguments, and evaluates to the logger's `Result`. The message is only
//! formatted when the level is enabled. Unlike the plain `Logger` methods,
//! the macros also record the calling module in the `source` field.
//!
//! # Examples
//!
//! ```
//! use ctxlog::prelude::*;
//! use ctxlog::info;
//!
//! let logger = Logger::builder().output(std::io::sink()).build();
//! let ctx = Context::background().append("request_id", "abc");
//!
//! info!(logger, ctx, "Server started").unwrap();
//!
//! let port = 8080;
//! info!(logger, ctx, "Server listening on port {}", port).unwrap();
//! ```

/// Log a message at the given level with automatic formatting.
///
/// # Examples
///
/// ```
/// # use ctxlog::prelude::*;
/// # let logger = Logger::builder().output(std::io::sink()).build();
/// # let ctx = Context::background();
/// use ctxlog::log;
/// log!(logger, ctx, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, ctx, LogLevel::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $ctx:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let level: $crate::LogLevel = $level;
        if logger.enabled(level) {
            let source = $crate::Source::new(file!(), line!()).with_function(module_path!());
            let record = $crate::Record::new(level, format!($($arg)+)).with_source(source);
            logger.log_record(&$ctx, record)
        } else {
            $crate::Result::Ok(())
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use ctxlog::prelude::*;
/// # let logger = Logger::builder().output(std::io::sink()).build();
/// # let ctx = Context::background();
/// use ctxlog::debug;
/// // Below the default level: nothing is formatted or written
/// debug!(logger, ctx, "Counter value: {}", 10).unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use ctxlog::prelude::*;
/// # let logger = Logger::builder().output(std::io::sink()).build();
/// # let ctx = Context::background();
/// use ctxlog::error;
/// error!(logger, ctx, "Error code: {}, message: {}", 500, "Internal error").unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Fatal, $($arg)+)
    };
}

//! Deserializable logger configuration
//!
//! Lets the level, source flag and static attributes come from a config
//! file instead of code. The output sink is always chosen in code.
//!
//! ```
//! use ctxlog::{LoggerBuilder, LoggerConfig, LogLevel};
//!
//! let config: LoggerConfig = serde_json::from_str(
//!     r#"{"level": "debug", "source": false, "attrs": {"service": "api", "shard": 3}}"#,
//! ).unwrap();
//! assert_eq!(config.level, LogLevel::Debug);
//!
//! let logger = LoggerBuilder::from_config(&config)
//!     .output(std::io::sink())
//!     .build();
//! assert!(logger.enabled(LogLevel::Debug));
//! ```

use super::attr::{Attr, AttrValue};
use super::log_level::LogLevel;
use super::logger::LoggerBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Minimum level, spelled case-insensitively
    pub level: LogLevel,
    /// Annotate records with their call site
    pub source: bool,
    /// Static attributes, written in key order
    pub attrs: BTreeMap<String, serde_json::Value>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            source: true,
            attrs: BTreeMap::new(),
        }
    }
}

impl LoggerConfig {
    /// Static attributes as typed values
    pub fn static_attrs(&self) -> Vec<Attr> {
        self.attrs
            .iter()
            .map(|(key, value)| Attr::new(key.as_str(), AttrValue::from(value.clone())))
            .collect()
    }
}

impl LoggerBuilder {
    /// Builder seeded from `config`; the output stays standard output until set
    pub fn from_config(config: &LoggerConfig) -> Self {
        LoggerBuilder::new()
            .level(config.level)
            .source(config.source)
            .attrs(config.static_attrs())
    }
}

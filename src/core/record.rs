//! Log record structure

use super::attr::{Attr, AttrValue};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::panic::Location;

/// Call site of a logging statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Enclosing module path, when the call went through a logging macro
    pub function: Option<String>,
    pub file: String,
    pub line: u32,
}

impl Source {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            function: None,
            file: file.into(),
            line,
        }
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Source of the caller of the enclosing `#[track_caller]` chain
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    /// Render as a group attribute value
    pub fn to_value(&self) -> AttrValue {
        let mut fields = Vec::with_capacity(3);
        if let Some(ref function) = self.function {
            fields.push(Attr::new("function", function.as_str()));
        }
        fields.push(Attr::new("file", self.file.as_str()));
        fields.push(Attr::new("line", self.line));
        AttrValue::Group(fields)
    }
}

/// One emitted log event
#[derive(Debug, Clone)]
pub struct Record {
    pub time: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub source: Option<Source>,
    /// Attributes attached at the call site, or merged in by handlers
    pub attrs: Vec<Attr>,
}

impl Record {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            source: None,
            attrs: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    /// Append attributes after the existing ones
    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    /// Insert attributes ahead of the existing ones, keeping their order
    pub fn prepend_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        let existing = std::mem::take(&mut self.attrs);
        self.attrs.extend(attrs);
        self.attrs.extend(existing);
    }
}

//! Typed key-value attributes attached to records and contexts

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

/// Value type for structured logging attributes
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Time(DateTime<Utc>),
    /// Nested attributes, rendered as a JSON object
    Group(Vec<Attr>),
    /// Pre-serialized value, rendered as is
    Json(serde_json::Value),
    Null,
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => write!(f, "{}", s),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Uint(u) => write!(f, "{}", u),
            AttrValue::Float(fl) => write!(f, "{}", fl),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Time(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            AttrValue::Group(attrs) => {
                write!(f, "[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", attr)?;
                }
                write!(f, "]")
            }
            AttrValue::Json(v) => write!(f, "{}", v),
            AttrValue::Null => write!(f, "null"),
        }
    }
}

impl AttrValue {
    /// Convert to serde_json::Value for JSON serialization
    ///
    /// Non-finite floats become `null`. Groups keep duplicate keys only
    /// through [`Fields`]; this conversion collapses them.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            AttrValue::String(s) => serde_json::Value::String(s.clone()),
            AttrValue::Int(i) => serde_json::Value::Number((*i).into()),
            AttrValue::Uint(u) => serde_json::Value::Number((*u).into()),
            AttrValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            AttrValue::Bool(b) => serde_json::Value::Bool(*b),
            AttrValue::Time(t) => {
                serde_json::Value::String(t.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            AttrValue::Group(attrs) => serde_json::Value::Object(
                attrs
                    .iter()
                    .map(|a| (a.key.clone(), a.value.to_json_value()))
                    .collect(),
            ),
            AttrValue::Json(v) => v.clone(),
            AttrValue::Null => serde_json::Value::Null,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for AttrValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttrValue::String(s) => serializer.serialize_str(s),
            AttrValue::Int(i) => serializer.serialize_i64(*i),
            AttrValue::Uint(u) => serializer.serialize_u64(*u),
            AttrValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            AttrValue::Float(_) => serializer.serialize_unit(),
            AttrValue::Bool(b) => serializer.serialize_bool(*b),
            AttrValue::Time(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            AttrValue::Group(attrs) => Fields(attrs).serialize(serializer),
            AttrValue::Json(v) => v.serialize(serializer),
            AttrValue::Null => serializer.serialize_unit(),
        }
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<&String> for AttrValue {
    fn from(s: &String) -> Self {
        AttrValue::String(s.clone())
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<i32> for AttrValue {
    fn from(i: i32) -> Self {
        AttrValue::Int(i as i64)
    }
}

impl From<u64> for AttrValue {
    fn from(u: u64) -> Self {
        AttrValue::Uint(u)
    }
}

impl From<u32> for AttrValue {
    fn from(u: u32) -> Self {
        AttrValue::Uint(u as u64)
    }
}

impl From<usize> for AttrValue {
    fn from(u: usize) -> Self {
        AttrValue::Uint(u as u64)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        AttrValue::Float(f)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(t: DateTime<Utc>) -> Self {
        AttrValue::Time(t)
    }
}

impl From<Vec<Attr>> for AttrValue {
    fn from(attrs: Vec<Attr>) -> Self {
        AttrValue::Group(attrs)
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => AttrValue::Null,
            serde_json::Value::Bool(b) => AttrValue::Bool(b),
            serde_json::Value::String(s) => AttrValue::String(s),
            serde_json::Value::Number(ref n) => {
                if let Some(i) = n.as_i64() {
                    AttrValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    AttrValue::Uint(u)
                } else {
                    AttrValue::Json(v)
                }
            }
            other => AttrValue::Json(other),
        }
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(AttrValue::Null)
    }
}

/// A named, typed value
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: AttrValue,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Nested group of attributes under one key
    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(key, AttrValue::Group(attrs.into_iter().collect()))
    }

    /// Attribute holding any serializable value
    ///
    /// Serialization failures do not propagate: the value is recorded as an
    /// `!ERROR:` string carrying the reason instead.
    pub fn json<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let value = match serde_json::to_value(value) {
            Ok(v) => AttrValue::Json(v),
            Err(e) => AttrValue::String(format!("!ERROR:{}", e)),
        };
        Self::new(key, value)
    }

    /// Attribute holding the `Display` rendering of a value
    pub fn display(key: impl Into<String>, value: &dyn fmt::Display) -> Self {
        Self::new(key, value.to_string())
    }

    /// Whether this attribute is dropped from output
    ///
    /// Empty keys are dropped, and so are groups with nothing inside.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            AttrValue::Group(attrs) => self.key.is_empty() || attrs.iter().all(Attr::is_empty),
            _ => self.key.is_empty(),
        }
    }
}

impl<K: Into<String>, V: Into<AttrValue>> From<(K, V)> for Attr {
    fn from((key, value): (K, V)) -> Self {
        Attr::new(key, value)
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Serializes a slice of attributes as one JSON object
///
/// Entries are written in order and duplicate keys are kept, so the output
/// mirrors the attribute list exactly.
pub struct Fields<'a>(pub &'a [Attr]);

impl Serialize for Fields<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        for attr in self.0.iter().filter(|a| !a.is_empty()) {
            map.serialize_entry(&attr.key, &attr.value)?;
        }
        map.end()
    }
}

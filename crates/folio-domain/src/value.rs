//! Generic output values
//!
//! [`Value`] is what every typed field collapses into. It mirrors what a
//! schemaless document store can hold, plus two display-oriented variants
//! (`Money`, `Address`) that serialize as plain JSON strings and objects.

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed mapping used for nested values, sorted by key
pub type Mapping = BTreeMap<String, Value>;

/// A generic value in an output record
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value
    Null,
    /// Text
    Str(String),
    /// Whole number
    Int64(i64),
    /// Floating point number
    Float64(f64),
    /// Calendar date, serialized as `YYYY-MM-DD`
    Date(NaiveDate),
    /// Pre-formatted amount and symbol, e.g. `"19.50€"`
    Money(String),
    /// Address parts keyed by part name
    Address(Mapping),
    /// Ordered values
    List(Vec<Value>),
    /// Nested mapping
    Map(Mapping),
}

impl Value {
    /// Convert into a `serde_json::Value`
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Str(s) | Value::Money(s) => serde_json::Value::String(s.clone()),
            Value::Int64(n) => serde_json::Value::from(*n),
            // Non-finite floats have no JSON form
            Value::Float64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Value::Address(m) | Value::Map(m) => serde_json::Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }

    /// Short variant name for logs
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "str",
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::Date(_) => "date",
            Value::Money(_) => "money",
            Value::Address(_) => "address",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Borrow the text of a `Str` or `Money` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Money(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Str(s) | Value::Money(s) => serializer.serialize_str(s),
            Value::Int64(n) => serializer.serialize_i64(*n),
            Value::Float64(f) if f.is_finite() => serializer.serialize_f64(*f),
            Value::Float64(_) => serializer.serialize_unit(),
            Value::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Value::Address(m) | Value::Map(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) | Value::Money(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int64(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

//! Value domain stored in enum maps, and the descriptors that constrain it.
//!
//! A [`ValueType`] is either a primitive category tag or the exact nominal
//! name of a structured [`Value::Record`]. Matching is by category or exact
//! name, never structural.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value stored in an [`EnumMap`](crate::EnumMap) slot.
///
/// Null is not a `Value`; maps store it as a separate slot state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Record(Record),
}

/// A structured value with a nominal type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub type_name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field, builder style.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }
}

impl Value {
    /// False when a float anywhere in the value is infinite or NaN.
    ///
    /// JSON has no encoding for those, so they cannot survive a round trip.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(f) => f.is_finite(),
            Self::List(items) => items.iter().all(Value::is_finite),
            Self::Record(record) => record.fields.values().all(Value::is_finite),
            Self::Bool(_) | Self::Int(_) | Self::Text(_) => true,
        }
    }

    /// Short description of the runtime kind, used in error messages.
    pub fn kind(&self) -> String {
        match self {
            Self::Bool(_) => "bool".to_string(),
            Self::Int(_) => "int".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::Text(_) => "text".to_string(),
            Self::List(_) => "collection".to_string(),
            Self::Record(r) => format!("record {}", r.type_name),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}

/// Descriptor for the values an enum map accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Text,
    /// Any record, whatever its type name
    Object,
    /// Any list
    Collection,
    /// Accepts every value
    Any,
    /// Records whose type name matches exactly
    Named(String),
}

impl ValueType {
    /// Check whether a non-null value satisfies this descriptor.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_))
            | (Self::Float, Value::Float(_))
            | (Self::Text, Value::Text(_))
            | (Self::Collection, Value::List(_))
            | (Self::Object, Value::Record(_)) => true,
            (Self::Named(name), Value::Record(record)) => record.type_name == *name,
            _ => false,
        }
    }

    /// Parse the textual form used in `enumkit.toml` and on the command line.
    ///
    /// Anything that is not a category tag is taken as a nominal type name.
    pub fn parse(s: &str) -> Self {
        match s {
            "bool" | "boolean" => Self::Bool,
            "int" | "integer" => Self::Int,
            "float" | "double" => Self::Float,
            "text" | "string" => Self::Text,
            "object" => Self::Object,
            "collection" | "array" => Self::Collection,
            "any" | "mixed" => Self::Any,
            other => Self::Named(other.to_string()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("text"),
            Self::Object => f.write_str("object"),
            Self::Collection => f.write_str("collection"),
            Self::Any => f.write_str("any"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

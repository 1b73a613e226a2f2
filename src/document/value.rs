//! Document value model
//!
//! Values stored in a document:
//! - Unset: declared but not yet assigned (exempt from type checks)
//! - Scalars: unicode, int, float, bool, datetime, uuid
//! - Containers: list, mapping
//!
//! Mapping keys are typed, so a wildcard substructure can be keyed by
//! integers as well as by names.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::schema::FieldType;

/// Key of a document mapping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Boolean key
    Bool(bool),
    /// 64-bit signed integer key
    Int(i64),
    /// UTF-8 string key (ordinary field names)
    Unicode(String),
    /// UUID key
    Uuid(Uuid),
}

impl Key {
    /// Returns the field type this key is an instance of.
    pub fn field_type(&self) -> FieldType {
        match self {
            Key::Bool(_) => FieldType::Bool,
            Key::Int(_) => FieldType::Int,
            Key::Unicode(_) => FieldType::Unicode,
            Key::Uuid(_) => FieldType::Uuid,
        }
    }

    /// Returns the key as a field name, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Unicode(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(i) => write!(f, "{}", i),
            Key::Unicode(s) => write!(f, "{}", s),
            Key::Uuid(u) => write!(f, "{}", u),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Unicode(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Unicode(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::Unicode(s.clone())
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i64::from(i))
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl From<Uuid> for Key {
    fn from(u: Uuid) -> Self {
        Key::Uuid(u)
    }
}

/// Ordered mapping of keys to values.
pub type Mapping = BTreeMap<Key, Value>;

/// A document value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Declared but not yet assigned
    #[default]
    Unset,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Unicode(String),
    /// UTC timestamp
    DateTime(DateTime<Utc>),
    /// UUID
    Uuid(Uuid),
    /// Heterogeneous list
    List(Vec<Value>),
    /// Nested mapping
    Map(Mapping),
}

impl Value {
    /// Returns an empty mapping value.
    pub fn map() -> Self {
        Value::Map(Mapping::new())
    }

    /// Returns true for the unset sentinel.
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    /// Returns true if the value is a nested mapping.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Unicode(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the type name used in error messages.
    ///
    /// `Unset` reports as "unset"; every other variant reports the name of
    /// the field type it is an instance of.
    pub fn type_name(&self) -> &'static str {
        match self.field_type() {
            Some(t) => t.type_name(),
            None => "unset",
        }
    }

    /// Returns the field type this value is an instance of.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::Unset => None,
            Value::Bool(_) => Some(FieldType::Bool),
            Value::Int(_) => Some(FieldType::Int),
            Value::Float(_) => Some(FieldType::Float),
            Value::Unicode(_) => Some(FieldType::Unicode),
            Value::DateTime(_) => Some(FieldType::DateTime),
            Value::Uuid(_) => Some(FieldType::Uuid),
            Value::List(_) => Some(FieldType::List),
            Value::Map(_) => Some(FieldType::Dict),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Unicode(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Unicode(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Map(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Unset, Into::into)
    }
}

/// Converts JSON into document values.
///
/// `null` becomes `Unset`, object keys become unicode keys, integral
/// numbers become `Int` and all other numbers become `Float`.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Unset,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Unicode(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Key::Unicode(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Converts a JSON object into a mapping.
///
/// Returns `None` if `json` is not an object.
pub fn mapping_from_json(json: serde_json::Value) -> Option<Mapping> {
    match Value::from(json) {
        Value::Map(m) => Some(m),
        _ => None,
    }
}

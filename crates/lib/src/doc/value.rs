//! Value types for tracked documents.
//!
//! This module provides the `Value` enum that represents every value a
//! tracked document can hold: leaf scalars, nested documents and lists, and
//! denormalized references to other documents.

use chrono::{DateTime, Utc};

use super::list::List;
use super::plain::Plain;
use super::reference::Reference;
use super::{Doc, errors::DocError, id::Id};
use crate::registry::Registry;

/// Values that can be stored in tracked documents.
///
/// Leaf values are terminal scalars; `Doc` and `List` are branch values that
/// carry their own change tracking; `Ref` is a leaf with respect to diffing
/// (its resolved target is never traversed).
///
/// # Node equality
///
/// `PartialEq` on `Value` is *node equality*: scalars compare by value,
/// while `Doc` and `List` compare by node identity — two branches are equal
/// only when they are the same tracked node (clones made for baseline
/// snapshots preserve identity). References compare by their persisted
/// fields, ignoring the resolved target. There is no `Eq` because of floats.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null/empty value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text string value
    Text(String),
    /// Timestamp value
    Timestamp(DateTime<Utc>),
    /// Opaque document id
    Id(Id),
    /// Nested map document
    Doc(Doc),
    /// Nested list document
    List(List),
    /// Denormalized reference to another document
    Ref(Reference),
}

impl Value {
    /// Returns true if this is a leaf value (terminal node)
    pub fn is_leaf(&self) -> bool {
        !self.is_branch()
    }

    /// Returns true if this is a branch value (a tracked document or list)
    pub fn is_branch(&self) -> bool {
        matches!(self, Value::Doc(_) | Value::List(_))
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
            Value::Id(_) => "id",
            Value::Doc(_) => "doc",
            Value::List(_) => "list",
            Value::Ref(_) => "reference",
        }
    }

    /// True if this branch value reports pending modifications. Leaves are
    /// never modified on their own.
    pub fn modified(&self) -> bool {
        match self {
            Value::Doc(doc) => doc.modified(),
            Value::List(list) => list.modified(),
            _ => false,
        }
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to convert to an id
    pub fn as_id(&self) -> Option<Id> {
        match self {
            Value::Id(id) => Some(*id),
            _ => None,
        }
    }

    /// Attempts to convert to a nested document (immutable reference)
    pub fn as_doc(&self) -> Option<&Doc> {
        match self {
            Value::Doc(doc) => Some(doc),
            _ => None,
        }
    }

    /// Attempts to convert to a mutable nested document reference
    pub fn as_doc_mut(&mut self) -> Option<&mut Doc> {
        match self {
            Value::Doc(doc) => Some(doc),
            _ => None,
        }
    }

    /// Attempts to convert to a nested list (immutable reference)
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Attempts to convert to a mutable nested list reference
    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Attempts to convert to a reference
    pub fn as_ref_value(&self) -> Option<&Reference> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Attempts to convert to a mutable reference
    pub fn as_ref_value_mut(&mut self) -> Option<&mut Reference> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Recursively lowers this value to the plain document format. Branch
    /// values contribute their current effective view; references contribute
    /// their persisted fields only. No key escaping is applied.
    pub fn to_plain(&self) -> Plain {
        match self {
            Value::Null => Plain::Null,
            Value::Bool(b) => Plain::Bool(*b),
            Value::Int(n) => Plain::Int(*n),
            Value::Float(f) => Plain::Float(*f),
            Value::Text(s) => Plain::Text(s.clone()),
            Value::Timestamp(ts) => Plain::Timestamp(*ts),
            Value::Id(id) => Plain::Id(*id),
            Value::Doc(doc) => doc.to_plain(),
            Value::List(list) => list.to_plain(),
            Value::Ref(r) => r.to_plain(),
        }
    }

    /// Recursively classifies a plain value into the tracked variant set.
    /// Maps become tracked documents and sequences become tracked lists;
    /// strings are never treated as sequences.
    pub fn from_plain(plain: &Plain) -> Value {
        match plain {
            Plain::Null => Value::Null,
            Plain::Bool(b) => Value::Bool(*b),
            Plain::Int(n) => Value::Int(*n),
            Plain::Float(f) => Value::Float(*f),
            Plain::Text(s) => Value::Text(s.clone()),
            Plain::Timestamp(ts) => Value::Timestamp(*ts),
            Plain::Id(id) => Value::Id(*id),
            Plain::Seq(items) => Value::List(List::from_values(
                items.iter().map(Value::from_plain).collect(),
            )),
            Plain::Map(map) => {
                let mut doc = Doc::new();
                for (key, value) in map {
                    doc.insert_baseline(key.clone(), Value::from_plain(value));
                }
                Value::Doc(doc)
            }
        }
    }

    /// Like [`Value::from_plain`], but consults the registry for maps
    /// carrying a `_type` tag so typed variants (such as references) are
    /// reconstructed instead of plain documents.
    pub fn from_plain_with(registry: &Registry, plain: &Plain) -> Result<Value, DocError> {
        match plain {
            Plain::Map(map) => {
                if let Some(Plain::Text(tag)) = map.get("_type")
                    && let Some(factory) = registry.factory(tag)
                {
                    return factory(plain);
                }
                let mut doc = Doc::new();
                for (key, value) in map {
                    doc.insert_baseline(key.clone(), Value::from_plain_with(registry, value)?);
                }
                Ok(Value::Doc(doc))
            }
            Plain::Seq(items) => {
                let values = items
                    .iter()
                    .map(|item| Value::from_plain_with(registry, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(List::from_values(values)))
            }
            other => Ok(Value::from_plain(other)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Id(a), Value::Id(b)) => a == b,
            // Branch values compare by node identity
            (Value::Doc(a), Value::Doc(b)) => a.same_node(b),
            (Value::List(a), Value::List(b)) => a.same_node(b),
            (Value::Ref(a), Value::Ref(b)) => a == b,
            _ => false,
        }
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Id> for Value {
    fn from(value: Id) -> Self {
        Value::Id(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Doc> for Value {
    fn from(value: Doc) -> Self {
        Value::Doc(value)
    }
}

impl From<List> for Value {
    fn from(value: List) -> Self {
        Value::List(value)
    }
}

impl From<Reference> for Value {
    fn from(value: Reference) -> Self {
        Value::Ref(value)
    }
}

// TryFrom implementations for typed access
impl TryFrom<&Value> for i64 {
    type Error = DocError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_int().ok_or_else(|| DocError::TypeMismatch {
            expected: "int".to_string(),
            actual: value.type_name().to_string(),
        })
    }
}

impl TryFrom<&Value> for f64 {
    type Error = DocError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Int(n) => Ok(*n as f64),
            _ => Err(DocError::TypeMismatch {
                expected: "float".to_string(),
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl TryFrom<&Value> for bool {
    type Error = DocError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or_else(|| DocError::TypeMismatch {
            expected: "bool".to_string(),
            actual: value.type_name().to_string(),
        })
    }
}

impl TryFrom<&Value> for String {
    type Error = DocError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| DocError::TypeMismatch {
                expected: "text".to_string(),
                actual: value.type_name().to_string(),
            })
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = DocError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        value.as_text().ok_or_else(|| DocError::TypeMismatch {
            expected: "text".to_string(),
            actual: value.type_name().to_string(),
        })
    }
}

impl TryFrom<&Value> for Id {
    type Error = DocError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_id().ok_or_else(|| DocError::TypeMismatch {
            expected: "id".to_string(),
            actual: value.type_name().to_string(),
        })
    }
}

impl TryFrom<&Value> for DateTime<Utc> {
    type Error = DocError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            _ => Err(DocError::TypeMismatch {
                expected: "timestamp".to_string(),
                actual: value.type_name().to_string(),
            }),
        }
    }
}

// PartialEq implementations for comparing Value with primitives
impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Value::Int(n) if n == other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Value::Float(f) if f == other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        matches!(self, Value::Bool(b) if b == other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Value::Text(s) if s == other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

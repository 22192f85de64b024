//! The plain document format.
//!
//! `Plain` is the wire shape exchanged with the document store: nested maps
//! with string keys, ordered sequences, and scalars. It carries no change
//! tracking. Tracked documents lower to `Plain` via `to_plain()` and are
//! reconstructed from it via `from_plain()`.
//!
//! Timestamps and opaque ids have no native JSON rendering; they use the
//! store's extended-JSON conventions (`{"$date": ...}` and `{"$oid": ...}`).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::id::Id;

/// A plain document value: scalars, sequences, and string-keyed maps.
///
/// Map key order is preserved (insertion order), matching the tracked
/// document types built on top of this shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Plain {
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
    /// Ordered sequence of values
    Seq(Vec<Plain>),
    /// String-keyed map of values
    Map(IndexMap<String, Plain>),
}

impl Plain {
    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Plain::Null => "null",
            Plain::Bool(_) => "bool",
            Plain::Int(_) => "int",
            Plain::Float(_) => "float",
            Plain::Text(_) => "text",
            Plain::Timestamp(_) => "timestamp",
            Plain::Id(_) => "id",
            Plain::Seq(_) => "seq",
            Plain::Map(_) => "map",
        }
    }

    /// Attempts to view this value as a map
    pub fn as_map(&self) -> Option<&IndexMap<String, Plain>> {
        match self {
            Plain::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Attempts to view this value as a sequence
    pub fn as_seq(&self) -> Option<&[Plain]> {
        match self {
            Plain::Seq(seq) => Some(seq),
            _ => None,
        }
    }

    /// Attempts to view this value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Plain::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Converts to a JSON value, using extended-JSON renderings for
    /// timestamps and ids.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{Map, Value as Json, json};
        match self {
            Plain::Null => Json::Null,
            Plain::Bool(b) => Json::Bool(*b),
            Plain::Int(n) => json!(n),
            Plain::Float(f) => json!(f),
            Plain::Text(s) => Json::String(s.clone()),
            Plain::Timestamp(ts) => json!({ "$date": ts.to_rfc3339() }),
            Plain::Id(id) => json!({ "$oid": id.to_string() }),
            Plain::Seq(seq) => Json::Array(seq.iter().map(Plain::to_json).collect()),
            Plain::Map(map) => {
                let mut out = Map::new();
                for (key, value) in map {
                    out.insert(key.clone(), value.to_json());
                }
                Json::Object(out)
            }
        }
    }

    /// Converts from a JSON value, recognizing the extended-JSON renderings
    /// produced by [`Plain::to_json`].
    pub fn from_json(json: &serde_json::Value) -> Plain {
        use serde_json::Value as Json;
        match json {
            Json::Null => Plain::Null,
            Json::Bool(b) => Plain::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Plain::Int(i)
                } else {
                    Plain::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Plain::Text(s.clone()),
            Json::Array(items) => Plain::Seq(items.iter().map(Plain::from_json).collect()),
            Json::Object(map) => {
                if map.len() == 1 {
                    if let Some(Json::String(s)) = map.get("$oid")
                        && let Ok(id) = s.parse::<Id>()
                    {
                        return Plain::Id(id);
                    }
                    if let Some(Json::String(s)) = map.get("$date")
                        && let Ok(ts) = DateTime::parse_from_rfc3339(s)
                    {
                        return Plain::Timestamp(ts.with_timezone(&Utc));
                    }
                }
                let mut out = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), Plain::from_json(value));
                }
                Plain::Map(out)
            }
        }
    }

    /// Renders the value as a JSON string.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Parses a value from a JSON string.
    pub fn from_json_str(s: &str) -> crate::Result<Plain> {
        let json: serde_json::Value = serde_json::from_str(s)?;
        Ok(Plain::from_json(&json))
    }
}

impl serde::Serialize for Plain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Plain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(Plain::from_json(&json))
    }
}

impl From<bool> for Plain {
    fn from(value: bool) -> Self {
        Plain::Bool(value)
    }
}

impl From<i64> for Plain {
    fn from(value: i64) -> Self {
        Plain::Int(value)
    }
}

impl From<f64> for Plain {
    fn from(value: f64) -> Self {
        Plain::Float(value)
    }
}

impl From<&str> for Plain {
    fn from(value: &str) -> Self {
        Plain::Text(value.to_string())
    }
}

impl From<String> for Plain {
    fn from(value: String) -> Self {
        Plain::Text(value)
    }
}

impl From<Id> for Plain {
    fn from(value: Id) -> Self {
        Plain::Id(value)
    }
}

impl From<DateTime<Utc>> for Plain {
    fn from(value: DateTime<Utc>) -> Self {
        Plain::Timestamp(value)
    }
}

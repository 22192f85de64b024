//! The partial-update operation and its reference application semantics.
//!
//! An [`Update`] is the minimal operation the diff engine produces:
//! dotted-path assignments (`$set`) and dotted-path deletions (`$unset`).
//! [`apply_update`] is a reference implementation of the store's update
//! semantics over plain documents, used to verify diff round trips and by
//! embedders who keep documents outside a real store.

use std::collections::{BTreeMap, BTreeSet};

use super::errors::DiffError;
use crate::doc::plain::Plain;

/// A partial-update operation with `$set`/`$unset` semantics.
///
/// Paths join map keys (already escaped) and decimal list indices with `.`.
/// An empty path means "replace the entire addressed document". The wire
/// rendering omits `$set`/`$unset` entirely when empty:
///
/// ```
/// use overdoc::diff::Update;
///
/// let mut update = Update::new();
/// update.set("b".to_string(), 22i64.into());
/// update.unset("a".to_string());
/// assert_eq!(
///     serde_json::to_string(&update).unwrap(),
///     r#"{"$set":{"b":22},"$unset":{"a":null}}"#,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
    set: BTreeMap<String, Plain>,
    unset: BTreeSet<String>,
}

impl Update {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the update carries no operations at all.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// Records a path assignment.
    pub fn set(&mut self, path: String, value: Plain) {
        self.set.insert(path, value);
    }

    /// Records a path deletion.
    pub fn unset(&mut self, path: String) {
        self.unset.insert(path);
    }

    /// The recorded assignments, ordered by path.
    pub fn set_ops(&self) -> &BTreeMap<String, Plain> {
        &self.set
    }

    /// The recorded deletions, ordered by path.
    pub fn unset_ops(&self) -> &BTreeSet<String> {
        &self.unset
    }
}

/// Wire shape: `{"$set": {...}, "$unset": {path: null, ...}}` with empty
/// maps dropped.
#[derive(serde::Serialize, serde::Deserialize)]
struct UpdateWire {
    #[serde(rename = "$set", default, skip_serializing_if = "BTreeMap::is_empty")]
    set: BTreeMap<String, Plain>,
    #[serde(rename = "$unset", default, skip_serializing_if = "BTreeMap::is_empty")]
    unset: BTreeMap<String, ()>,
}

impl serde::Serialize for Update {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let wire = UpdateWire {
            set: self.set.clone(),
            unset: self.unset.iter().map(|path| (path.clone(), ())).collect(),
        };
        wire.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Update {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = UpdateWire::deserialize(deserializer)?;
        Ok(Update {
            set: wire.set,
            unset: wire.unset.into_keys().collect(),
        })
    }
}

/// Applies an update to a plain document using the store's path semantics.
///
/// Escaped keys contain no literal `.`, so splitting paths on `.` is
/// unambiguous. Intermediate maps are created on demand; assigning past
/// the end of a sequence pads it with nulls; unsetting a sequence element
/// nulls it out rather than shifting later indices. An empty `$set` path
/// replaces the whole document.
pub fn apply_update(doc: &mut Plain, update: &Update) -> Result<(), DiffError> {
    for (path, value) in &update.set {
        if path.is_empty() {
            *doc = value.clone();
        } else {
            set_path(doc, path, value.clone())?;
        }
    }
    for path in &update.unset {
        unset_path(doc, path)?;
    }
    Ok(())
}

fn set_path(doc: &mut Plain, path: &str, value: Plain) -> Result<(), DiffError> {
    let mut target = doc;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let last = segments.peek().is_none();
        target = match target {
            Plain::Map(map) => {
                if last {
                    map.insert(segment.to_string(), value);
                    return Ok(());
                }
                map.entry(segment.to_string())
                    .or_insert_with(|| Plain::Map(Default::default()))
            }
            Plain::Seq(seq) => {
                let index = parse_index(path, segment)?;
                if index >= seq.len() {
                    seq.resize(index + 1, Plain::Null);
                }
                if last {
                    seq[index] = value;
                    return Ok(());
                }
                &mut seq[index]
            }
            other => {
                return Err(DiffError::InvalidPath {
                    path: path.to_string(),
                    reason: format!("cannot descend into {} at '{segment}'", other.type_name()),
                });
            }
        };
    }
    Ok(())
}

fn unset_path(doc: &mut Plain, path: &str) -> Result<(), DiffError> {
    if path.is_empty() {
        return Err(DiffError::InvalidPath {
            path: path.to_string(),
            reason: "empty unset path".to_string(),
        });
    }
    let (parent, leaf) = path.rsplit_once('.').unwrap_or(("", path));

    let mut target = doc;
    for segment in parent.split('.').filter(|s| !s.is_empty()) {
        target = match target {
            Plain::Map(map) => match map.get_mut(segment) {
                Some(child) => child,
                // Unsetting below a missing parent is a no-op
                None => return Ok(()),
            },
            Plain::Seq(seq) => {
                let index = parse_index(path, segment)?;
                match seq.get_mut(index) {
                    Some(child) => child,
                    None => return Ok(()),
                }
            }
            other => {
                return Err(DiffError::InvalidPath {
                    path: path.to_string(),
                    reason: format!("cannot descend into {} at '{segment}'", other.type_name()),
                });
            }
        };
    }

    match target {
        Plain::Map(map) => {
            map.shift_remove(leaf);
        }
        Plain::Seq(seq) => {
            let index = parse_index(path, leaf)?;
            if let Some(slot) = seq.get_mut(index) {
                *slot = Plain::Null;
            }
        }
        other => {
            return Err(DiffError::InvalidPath {
                path: path.to_string(),
                reason: format!("cannot unset inside {}", other.type_name()),
            });
        }
    }
    Ok(())
}

fn parse_index(path: &str, segment: &str) -> Result<usize, DiffError> {
    segment.parse().map_err(|_| DiffError::InvalidPath {
        path: path.to_string(),
        reason: format!("'{segment}' is not a sequence index"),
    })
}

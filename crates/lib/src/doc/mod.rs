//! Change-tracked document model.
//!
//! This module provides the dual-state document types: [`Doc`] tracks a
//! string-keyed map against a committed baseline using an overlay and
//! tombstones, [`List`] tracks an ordered sequence wholesale, and [`Value`]
//! is the shared variant over scalars, branches, and references.
//!
//! Mutations never touch the baseline until `apply()`; `revert()` discards
//! them. The diff engine reads the tracking state directly to produce a
//! minimal partial update (see [`crate::diff`]).
//!
//! # Usage
//!
//! ```
//! use overdoc::Doc;
//!
//! let mut doc = Doc::new();
//! doc.set("name", "Alice");
//! doc.set("age", 30i64);
//! assert!(doc.modified());
//!
//! doc.apply();
//! assert!(!doc.modified());
//!
//! doc.set("age", 31i64);
//! doc.revert();
//! assert_eq!(doc.get_as::<i64>("age"), Some(30));
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use uuid::Uuid;

// Submodules
pub mod accessor;
mod cache;
pub mod errors;
pub mod id;
pub mod list;
pub mod plain;
pub mod reference;
pub mod value;

// Convenience re-exports for core document types
pub use accessor::Field;
pub use errors::DocError;
pub use id::Id;
pub use list::List;
pub use plain::Plain;
pub use reference::Reference;
pub use value::Value;

use cache::ModifiedCache;
use list::{apply_child, revert_child};

use crate::registry::Registry;

/// A map document tracking changes against a committed baseline.
///
/// `Doc` holds three pieces of state: the baseline (last committed map),
/// an overlay of uncommitted additions and modifications, and a tombstone
/// set of keys deleted since the baseline. The *effective view* is
/// `(baseline - tombstones) ∪ overlay`, iterated in baseline key order
/// (minus tombstoned keys) followed by overlay-only keys in insertion
/// order.
///
/// Invariant: a key is never in the overlay and the tombstone set at the
/// same time. Setting a key back to its exact baseline value clears it from
/// the overlay instead of recording a no-op modification.
///
/// The model is single-writer and not thread-safe; callers serialize
/// access.
#[derive(Debug, Clone)]
pub struct Doc {
    node_id: Uuid,
    baseline: IndexMap<String, Value>,
    overlay: IndexMap<String, Value>,
    tombstones: HashSet<String>,
    cache: ModifiedCache,
}

impl Doc {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Self {
            node_id: Uuid::new_v4(),
            baseline: IndexMap::new(),
            overlay: IndexMap::new(),
            tombstones: HashSet::new(),
            cache: ModifiedCache::default(),
        }
    }

    /// Creates a tracked document from a plain map. The result is clean:
    /// the plain contents become the baseline.
    pub fn from_plain(plain: &Plain) -> Result<Self, DocError> {
        match plain {
            Plain::Map(_) => match Value::from_plain(plain) {
                Value::Doc(doc) => Ok(doc),
                _ => unreachable!("plain maps classify as documents"),
            },
            other => Err(DocError::TypeMismatch {
                expected: "map".to_string(),
                actual: other.type_name().to_string(),
            }),
        }
    }

    /// Like [`Doc::from_plain`], but consults the registry for nested maps
    /// carrying a `_type` tag, reconstructing typed variants such as
    /// references. The root map itself is always reconstructed as a plain
    /// document.
    pub fn from_plain_with(registry: &Registry, plain: &Plain) -> Result<Self, DocError> {
        let map = plain.as_map().ok_or_else(|| DocError::TypeMismatch {
            expected: "map".to_string(),
            actual: plain.type_name().to_string(),
        })?;
        let mut doc = Doc::new();
        for (key, value) in map {
            doc.insert_baseline(key.clone(), Value::from_plain_with(registry, value)?);
        }
        Ok(doc)
    }

    /// True when `other` is the same tracked node as `self`.
    pub fn same_node(&self, other: &Doc) -> bool {
        self.node_id == other.node_id
    }

    /// Seeds a baseline entry during construction. Bypasses change
    /// tracking: the entry is committed state.
    pub(crate) fn insert_baseline(&mut self, key: String, value: Value) {
        self.baseline.insert(key, value);
        self.cache.invalidate();
    }

    /// Returns the number of keys in the effective view.
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    /// Returns true if the effective view has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys().next().is_none()
    }

    /// Returns true if the effective view contains the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.overlay.contains_key(key)
            || (!self.tombstones.contains(key) && self.baseline.contains_key(key))
    }

    /// Gets the effective value for a key.
    pub fn get(&self, key: &str) -> Result<&Value, DocError> {
        if let Some(value) = self.overlay.get(key) {
            return Ok(value);
        }
        if self.tombstones.contains(key) {
            return Err(DocError::KeyNotFound {
                key: key.to_string(),
            });
        }
        self.baseline.get(key).ok_or_else(|| DocError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Gets a mutable reference to the effective value for a key.
    ///
    /// This is the path for in-place mutation of nested documents. Handing
    /// out a mutable child may change the subtree, so the modified memo is
    /// invalidated up front; ancestors re-query lazily.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value, DocError> {
        self.cache.invalidate();
        if let Some(value) = self.overlay.get_mut(key) {
            return Ok(value);
        }
        if self.tombstones.contains(key) {
            return Err(DocError::KeyNotFound {
                key: key.to_string(),
            });
        }
        self.baseline
            .get_mut(key)
            .ok_or_else(|| DocError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Gets a value with typed conversion, or `None` if the key is absent
    /// or the type does not match.
    pub fn get_as<'a, T>(&'a self, key: &str) -> Option<T>
    where
        T: TryFrom<&'a Value, Error = DocError>,
    {
        T::try_from(self.get(key).ok()?).ok()
    }

    /// Assigns a value to a key.
    ///
    /// Setting a key back to a value equal to its (non-tombstoned)
    /// baseline entry restores the clean state for that key: the overlay
    /// entry is dropped instead of recording a no-op. Equality here is
    /// node equality plus content equality — a clone of a baseline branch
    /// child shares the node id but may carry pending changes of its own,
    /// so node identity alone cannot justify the restore. A freshly built
    /// nested document always lands in the overlay.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        self.cache.invalidate();

        match self.baseline.get(&key) {
            Some(base)
                if !self.tombstones.contains(&key)
                    && *base == value
                    && base.to_plain() == value.to_plain() =>
            {
                self.overlay.shift_remove(&key);
            }
            _ => {
                self.overlay.insert(key.clone(), value);
            }
        }
        self.tombstones.remove(&key);
    }

    /// Deletes a key from the effective view.
    ///
    /// Baseline keys are tombstoned; overlay-only keys simply disappear.
    /// Deleting a key that is absent (or already tombstoned) is an error.
    pub fn delete(&mut self, key: &str) -> Result<(), DocError> {
        if self.tombstones.contains(key)
            || (!self.baseline.contains_key(key) && !self.overlay.contains_key(key))
        {
            return Err(DocError::KeyNotFound {
                key: key.to_string(),
            });
        }
        self.cache.invalidate();
        self.overlay.shift_remove(key);
        if self.baseline.contains_key(key) {
            self.tombstones.insert(key.to_string());
        }
        Ok(())
    }

    /// Returns an iterator over the keys of the effective view, in
    /// effective order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the key-value pairs of the effective view:
    /// baseline keys (minus tombstoned ones, shadowed by the overlay where
    /// applicable) in baseline order, then overlay-only keys in insertion
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.baseline
            .iter()
            .filter(|(key, _)| !self.tombstones.contains(*key))
            .map(|(key, value)| (key.as_str(), self.overlay.get(key).unwrap_or(value)))
            .chain(
                self.overlay
                    .iter()
                    .filter(|(key, _)| !self.baseline.contains_key(*key))
                    .map(|(key, value)| (key.as_str(), value)),
            )
    }

    /// Returns an iterator over the values of the effective view.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.iter().map(|(_, value)| value)
    }

    /// Mutable iteration over the effective view, used by the resolver to
    /// walk references in place.
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.cache.invalidate();
        let overlaid: HashSet<String> = self.overlay.keys().cloned().collect();
        let tombstones = &self.tombstones;
        self.baseline
            .iter_mut()
            .filter(move |(key, _)| !tombstones.contains(*key) && !overlaid.contains(*key))
            .map(|(_, value)| value)
            .chain(self.overlay.values_mut())
    }

    /// Read-only view of the last committed state.
    pub fn baseline(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.baseline.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read-only view of the uncommitted additions and modifications.
    pub fn overlay(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.overlay.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The keys deleted since the last apply.
    pub fn tombstoned(&self) -> impl Iterator<Item = &str> {
        self.tombstones.iter().map(String::as_str)
    }

    /// True if the given key is tombstoned.
    pub fn is_tombstoned(&self, key: &str) -> bool {
        self.tombstones.contains(key)
    }

    pub(crate) fn in_overlay(&self, key: &str) -> bool {
        self.overlay.contains_key(key)
    }

    /// True if the document has been modified since the last apply: the
    /// overlay or tombstone set is non-empty, or some effective branch
    /// child is itself modified. Memoized until the next mutation.
    pub fn modified(&self) -> bool {
        if let Some(modified) = self.cache.get() {
            return modified;
        }

        let modified = !self.overlay.is_empty()
            || !self.tombstones.is_empty()
            || self.values().any(Value::modified);

        self.cache.store(modified)
    }

    /// Commits all pending changes: branch children apply recursively, the
    /// effective view becomes the new baseline (preserving effective
    /// order), and the overlay and tombstones are cleared.
    pub fn apply(&mut self) {
        self.cache.invalidate();

        let baseline = std::mem::take(&mut self.baseline);
        let mut overlay = std::mem::take(&mut self.overlay);
        let tombstones = std::mem::take(&mut self.tombstones);

        let mut next = IndexMap::with_capacity(baseline.len() + overlay.len());
        for (key, value) in baseline {
            if tombstones.contains(&key) {
                continue;
            }
            let mut value = overlay.shift_remove(&key).unwrap_or(value);
            apply_child(&mut value);
            next.insert(key, value);
        }
        for (key, mut value) in overlay {
            apply_child(&mut value);
            next.insert(key, value);
        }
        self.baseline = next;
    }

    /// Discards all pending changes, restoring the baseline as the
    /// effective view. Baseline branch children revert recursively —
    /// including tombstoned ones, which come back clean.
    pub fn revert(&mut self) {
        self.cache.invalidate();
        self.overlay.clear();
        self.tombstones.clear();
        for value in self.baseline.values_mut() {
            revert_child(value);
        }
    }

    /// The document's `_id` identity field, if assigned.
    pub fn id(&self) -> Option<Id> {
        self.get("_id").ok().and_then(|v| v.as_id())
    }

    /// True if the document has been assigned an `_id`.
    pub fn has_id(&self) -> bool {
        self.id().is_some()
    }

    /// The document's `_type` tag, if present.
    pub fn doc_type(&self) -> Option<&str> {
        self.get("_type").ok().and_then(|v| v.as_text())
    }

    /// Lowers the effective view to the plain document format. No key
    /// escaping is applied; the diff engine escapes at emission time.
    pub fn to_plain(&self) -> Plain {
        let mut map = IndexMap::with_capacity(self.len());
        for (key, value) in self.iter() {
            map.insert(key.to_string(), value.to_plain());
        }
        Plain::Map(map)
    }
}

impl Default for Doc {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, Value)> for Doc {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut doc = Doc::new();
        for (key, value) in iter {
            doc.insert_baseline(key, value);
        }
        doc
    }
}

// Builder pattern methods
impl Doc {
    /// Builder method seeding a committed baseline entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_baseline(key.into(), value.into());
        self
    }
}

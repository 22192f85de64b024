//! Index-tracked list documents.
//!
//! `List` keeps two sequences: the baseline (last committed state) and the
//! full working copy. There is no per-index tombstone set — a positional
//! delete shifts every later index, so the working copy is tracked
//! wholesale and compared against the baseline on demand.

use uuid::Uuid;

use super::cache::ModifiedCache;
use super::errors::DocError;
use super::plain::Plain;
use super::value::Value;

/// An ordered document tracking changes against a committed baseline.
///
/// All index operations bounds-check against the working copy. Branch
/// children are shared between baseline and working copy by node identity:
/// mutating a child in place (through [`List::get_mut`]) is observed lazily
/// when `modified()` re-queries the child.
///
/// Baseline snapshots are always taken from clean children (at construction
/// and immediately after the children themselves apply), so `revert()` can
/// restore the working copy from the baseline alone.
#[derive(Debug, Clone)]
pub struct List {
    node_id: Uuid,
    baseline: Vec<Value>,
    current: Vec<Value>,
    cache: ModifiedCache,
}

impl List {
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::from_values(Vec::new())
    }

    /// Creates a list whose baseline and working copy start as the given
    /// values.
    pub(crate) fn from_values(values: Vec<Value>) -> Self {
        Self {
            node_id: Uuid::new_v4(),
            baseline: values.clone(),
            current: values,
            cache: ModifiedCache::default(),
        }
    }

    /// Creates a tracked list from a plain sequence.
    pub fn from_plain(plain: &Plain) -> Result<Self, DocError> {
        match plain {
            Plain::Seq(items) => Ok(Self::from_values(
                items.iter().map(Value::from_plain).collect(),
            )),
            other => Err(DocError::TypeMismatch {
                expected: "seq".to_string(),
                actual: other.type_name().to_string(),
            }),
        }
    }

    /// True when `other` is the same tracked node as `self`.
    pub fn same_node(&self, other: &List) -> bool {
        self.node_id == other.node_id
    }

    /// Returns the number of items in the working copy.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Returns true if the working copy is empty.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Gets the item at the given index.
    pub fn get(&self, index: usize) -> Result<&Value, DocError> {
        self.current.get(index).ok_or(DocError::IndexOutOfBounds {
            index,
            len: self.current.len(),
        })
    }

    /// Gets a mutable reference to the item at the given index.
    ///
    /// Handing out a mutable child may change the subtree, so the modified
    /// memo is invalidated up front.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut Value, DocError> {
        self.cache.invalidate();
        let len = self.current.len();
        self.current
            .get_mut(index)
            .ok_or(DocError::IndexOutOfBounds { index, len })
    }

    /// Replaces the item at the given index.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<(), DocError> {
        if index >= self.current.len() {
            return Err(DocError::IndexOutOfBounds {
                index,
                len: self.current.len(),
            });
        }
        self.cache.invalidate();
        self.current[index] = value.into();
        Ok(())
    }

    /// Inserts an item at the given index, shifting later items.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<(), DocError> {
        if index > self.current.len() {
            return Err(DocError::IndexOutOfBounds {
                index,
                len: self.current.len(),
            });
        }
        self.cache.invalidate();
        self.current.insert(index, value.into());
        Ok(())
    }

    /// Removes and returns the item at the given index, shifting later
    /// items.
    pub fn delete(&mut self, index: usize) -> Result<Value, DocError> {
        if index >= self.current.len() {
            return Err(DocError::IndexOutOfBounds {
                index,
                len: self.current.len(),
            });
        }
        self.cache.invalidate();
        Ok(self.current.remove(index))
    }

    /// Appends an item to the end of the list.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.cache.invalidate();
        self.current.push(value.into());
    }

    /// Returns an iterator over the working copy.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.current.iter()
    }

    /// Returns a mutable iterator over the working copy.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.cache.invalidate();
        self.current.iter_mut()
    }

    /// The working copy as a slice.
    pub fn items(&self) -> &[Value] {
        &self.current
    }

    /// The last committed state as a slice.
    pub fn baseline(&self) -> &[Value] {
        &self.baseline
    }

    /// True if the list has been modified since the last apply.
    ///
    /// Compared length-first, then by positional node equality, then by
    /// asking positionally shared branch children whether they themselves
    /// are modified. The result is memoized until the next mutation.
    pub fn modified(&self) -> bool {
        if let Some(modified) = self.cache.get() {
            return modified;
        }

        let modified = if self.current.len() != self.baseline.len() {
            true
        } else if self
            .current
            .iter()
            .zip(&self.baseline)
            .any(|(cur, base)| cur != base)
        {
            true
        } else {
            self.current.iter().any(Value::modified)
        };

        self.cache.store(modified)
    }

    /// Commits the working copy: children apply first, then the baseline is
    /// snapshotted from the (now clean) working copy.
    pub fn apply(&mut self) {
        self.cache.invalidate();
        for item in &mut self.current {
            apply_child(item);
        }
        self.baseline = self.current.clone();
    }

    /// Discards all modifications since the last apply, restoring the
    /// baseline as the working copy.
    pub fn revert(&mut self) {
        self.cache.invalidate();
        self.current = self.baseline.clone();
    }

    /// Lowers the working copy to the plain document format. No key
    /// escaping is applied.
    pub fn to_plain(&self) -> Plain {
        Plain::Seq(self.current.iter().map(Value::to_plain).collect())
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Value> for List {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self::from_values(iter.into_iter().collect())
    }
}

pub(crate) fn apply_child(value: &mut Value) {
    match value {
        Value::Doc(doc) => doc.apply(),
        Value::List(list) => list.apply(),
        _ => {}
    }
}

pub(crate) fn revert_child(value: &mut Value) {
    match value {
        Value::Doc(doc) => doc.revert(),
        Value::List(list) => list.revert(),
        _ => {}
    }
}

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use overdoc::{Doc, DocError, Id, List, Plain, Value, resolve::Loader};

// ==========================
// DOCUMENT FIXTURES
// ==========================

/// A clean document with a scalar, a nested document, and a nested list:
///
/// { "a": 1, "b": { "c": 2, "d": "deep" }, "items": [10, 20] }
pub fn sample_doc() -> Doc {
    let nested = Doc::new().with("c", 2i64).with("d", "deep");
    let items: List = [Value::Int(10), Value::Int(20)].into_iter().collect();
    Doc::new()
        .with("a", 1i64)
        .with("b", nested)
        .with("items", items)
}

/// A plain persisted document with an `_id` and `_type`, as a loader
/// would return it.
pub fn stored_plain(id: Id, type_name: &str, name: &str) -> Plain {
    let mut map = indexmap::IndexMap::new();
    map.insert("_id".to_string(), Plain::Id(id));
    map.insert("_type".to_string(), Plain::Text(type_name.to_string()));
    map.insert("name".to_string(), Plain::Text(name.to_string()));
    Plain::Map(map)
}

// ==========================
// ASSERTION HELPERS
// ==========================

/// Helper for checking KeyNotFound errors
pub fn assert_key_not_found(result: Result<&Value, DocError>) {
    match result {
        Err(ref err) if err.is_not_found() => (), // Expected
        other => panic!("Expected KeyNotFound error, got {other:?}"),
    }
}

// ==========================
// IN-MEMORY LOADER
// ==========================

/// A loader over a fixed set of plain documents, counting lookups so
/// tests can assert on memoization.
#[derive(Default)]
pub struct MemoryLoader {
    docs: RefCell<HashMap<Id, Plain>>,
    calls: Cell<usize>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a plain document under its `_id` field.
    pub fn insert(&self, plain: Plain) {
        let id = match plain.as_map().and_then(|m| m.get("_id")) {
            Some(Plain::Id(id)) => *id,
            other => panic!("fixture document needs an _id, got {other:?}"),
        };
        self.docs.borrow_mut().insert(id, plain);
    }

    /// Number of find_one calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Loader for MemoryLoader {
    fn find_one(&self, _type_name: &str, id: &Id) -> overdoc::Result<Option<Plain>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.docs.borrow().get(id).cloned())
    }
}

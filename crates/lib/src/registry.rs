//! Explicit type registry for document reconstruction.
//!
//! Persisted documents carry a `_type` tag. When a plain document is pulled
//! back into the tracked model, the registry maps that tag to a factory
//! that builds the right variant — out of the box, `"reference"` maps to
//! [`Reference`] reconstruction. The registry is a plain value constructed
//! at startup and passed explicitly to whatever deserializes documents
//! (the resolver, a store adapter); there is no global state.

use std::collections::HashMap;

use crate::doc::{DocError, Plain, Reference, Value, reference::REFERENCE_TYPE};

/// Builds a tracked value from a plain document carrying a matching
/// `_type` tag.
pub type Factory = Box<dyn Fn(&Plain) -> Result<Value, DocError> + Send + Sync>;

/// Maps `_type` tags to reconstruction factories.
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Registry {
    /// Creates an empty registry. Unknown tags fall back to plain document
    /// reconstruction.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in types registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(REFERENCE_TYPE, |plain| {
            Reference::from_plain(plain).map(Value::Ref)
        });
        registry
    }

    /// Registers a factory for a `_type` tag, replacing any previous
    /// registration.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        factory: impl Fn(&Plain) -> Result<Value, DocError> + Send + Sync + 'static,
    ) {
        self.factories.insert(type_name.into(), Box::new(factory));
    }

    /// True if a factory is registered for the tag.
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Looks up the factory for a tag.
    pub fn factory(&self, type_name: &str) -> Option<&Factory> {
        self.factories.get(type_name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

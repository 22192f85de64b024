//! Reference resolution against a pluggable document source.
//!
//! The [`Resolver`] walks a tracked document, finds [`Reference`] values
//! whose auto-load flag is set (or all of them, on request), and fills in
//! their resolved targets by asking a [`Loader`] for the plain documents.
//! Loaded targets are memoized by id, so two references to the same
//! document share one `Rc` and the loader is asked once. The resolver does
//! not recurse into loaded targets; callers resolve those separately if
//! they need the next hop.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::doc::{Doc, Id, Value};
use crate::registry::Registry;

/// A source of plain documents, keyed by type tag and id.
///
/// Implementations wrap whatever actually holds the documents: a store
/// client, an in-memory fixture, a cache in front of either.
pub trait Loader {
    /// Fetches the plain document with the given type tag and id, or
    /// `None` if no such document exists.
    fn find_one(&self, type_name: &str, id: &Id) -> crate::Result<Option<crate::doc::Plain>>;
}

/// Walks documents and loads their references through a [`Loader`].
pub struct Resolver<'a> {
    loader: &'a dyn Loader,
    registry: &'a Registry,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over a loader, reconstructing loaded documents
    /// through the given registry.
    pub fn new(loader: &'a dyn Loader, registry: &'a Registry) -> Self {
        Self { loader, registry }
    }

    /// Resolves references throughout `doc` with a fresh memo.
    ///
    /// With `load_all` false, only references flagged auto-load are
    /// resolved; with it true, every reference carrying a target id is.
    pub fn resolve(&self, doc: &mut Doc, load_all: bool) -> crate::Result<()> {
        let mut memo = HashMap::new();
        self.resolve_all(doc, load_all, &mut memo)
    }

    /// Resolves references throughout `doc`, sharing and extending the
    /// given memo. Pass the same memo across several documents to dedupe
    /// loads between them.
    pub fn resolve_all(
        &self,
        doc: &mut Doc,
        load_all: bool,
        memo: &mut HashMap<Id, Rc<Doc>>,
    ) -> crate::Result<()> {
        for value in doc.values_mut() {
            self.resolve_value(value, load_all, memo)?;
        }
        Ok(())
    }

    fn resolve_value(
        &self,
        value: &mut Value,
        load_all: bool,
        memo: &mut HashMap<Id, Rc<Doc>>,
    ) -> crate::Result<()> {
        match value {
            Value::Ref(reference) => {
                if !(load_all || reference.auto_load()) {
                    return Ok(());
                }
                let Some(id) = reference.target_id() else {
                    debug!("skipping reference with no target id");
                    return Ok(());
                };
                if let Some(resolved) = reference.resolved() {
                    // Already loaded; make it available to later references.
                    memo.entry(id).or_insert_with(|| Rc::clone(resolved));
                    return Ok(());
                }
                if let Some(target) = memo.get(&id) {
                    reference.set_resolved(Rc::clone(target));
                    return Ok(());
                }
                match self.loader.find_one(reference.target_type(), &id)? {
                    Some(plain) => {
                        let target = Rc::new(Doc::from_plain_with(self.registry, &plain)?);
                        memo.insert(id, Rc::clone(&target));
                        reference.set_resolved(target);
                    }
                    None => {
                        debug!(%id, target_type = reference.target_type(), "referenced document not found");
                    }
                }
            }
            Value::Doc(child) => self.resolve_all(child, load_all, memo)?,
            Value::List(child) => {
                for item in child.iter_mut() {
                    self.resolve_value(item, load_all, memo)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("registry", self.registry)
            .finish_non_exhaustive()
    }
}

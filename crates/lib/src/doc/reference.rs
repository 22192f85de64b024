//! Denormalized references between documents.
//!
//! A `Reference` is a foreign-key pointer: it persists the target's id and
//! type tag (captured from the target's identity fields at assignment time)
//! plus an auto-load flag. The resolved target is a shared, non-owning
//! association filled in by the resolver; it is never traversed by diffing
//! or serialization.

use std::rc::Rc;

use indexmap::IndexMap;

use super::plain::Plain;
use super::{Doc, errors::DocError, id::Id};

/// Type tag stored in the `_type` field of a serialized reference.
pub const REFERENCE_TYPE: &str = "reference";

/// A denormalized pointer to another document.
#[derive(Debug, Clone, Default)]
pub struct Reference {
    target_id: Option<Id>,
    target_type: String,
    auto_load: bool,
    resolved: Option<Rc<Doc>>,
}

impl Reference {
    /// Creates an empty reference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty reference that resolvers load automatically.
    pub fn auto_loading() -> Self {
        Self {
            auto_load: true,
            ..Self::default()
        }
    }

    /// The id of the referenced document, if one has been assigned.
    pub fn target_id(&self) -> Option<Id> {
        self.target_id
    }

    /// The type tag of the referenced document.
    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    /// True if resolvers should load this reference without being asked.
    pub fn auto_load(&self) -> bool {
        self.auto_load
    }

    /// Sets the auto-load flag.
    pub fn set_auto_load(&mut self, auto_load: bool) {
        self.auto_load = auto_load;
    }

    /// The resolved target document, if it has been loaded.
    pub fn resolved(&self) -> Option<&Rc<Doc>> {
        self.resolved.as_ref()
    }

    /// Stores a resolved target without touching the persisted fields.
    pub(crate) fn set_resolved(&mut self, doc: Rc<Doc>) {
        self.resolved = Some(doc);
    }

    /// Points this reference at a document, denormalizing its identity
    /// fields and keeping the document as the resolved target.
    ///
    /// The document must carry an `_id`; the `_type` tag is captured when
    /// present.
    pub fn assign(&mut self, target: Rc<Doc>) -> Result<(), DocError> {
        let id = target
            .get("_id")
            .ok()
            .and_then(|v| v.as_id())
            .ok_or_else(|| DocError::InvalidReference {
                reason: "target document has no _id".to_string(),
            })?;

        self.target_id = Some(id);
        self.target_type = target
            .get("_type")
            .ok()
            .and_then(|v| v.as_text())
            .unwrap_or_default()
            .to_string();
        self.resolved = Some(target);
        Ok(())
    }

    /// Blanks the reference: target id, type tag, and resolved target.
    pub fn clear(&mut self) {
        self.target_id = None;
        self.target_type.clear();
        self.resolved = None;
    }

    /// Lowers the reference to its persisted plain shape. Only the
    /// denormalized fields are emitted; the resolved target is not.
    pub fn to_plain(&self) -> Plain {
        let mut map = IndexMap::new();
        map.insert(
            "_type".to_string(),
            Plain::Text(REFERENCE_TYPE.to_string()),
        );
        map.insert(
            "referenced_id".to_string(),
            match self.target_id {
                Some(id) => Plain::Id(id),
                None => Plain::Null,
            },
        );
        map.insert(
            "referenced_type".to_string(),
            Plain::Text(self.target_type.clone()),
        );
        map.insert("auto_load".to_string(), Plain::Bool(self.auto_load));
        Plain::Map(map)
    }

    /// Reconstructs a reference from its persisted plain shape.
    pub fn from_plain(plain: &Plain) -> Result<Reference, DocError> {
        let map = plain.as_map().ok_or_else(|| DocError::InvalidReference {
            reason: format!("expected a map, found {}", plain.type_name()),
        })?;

        let target_id = match map.get("referenced_id") {
            None | Some(Plain::Null) => None,
            Some(Plain::Id(id)) => Some(*id),
            Some(Plain::Text(s)) if s.is_empty() => None,
            Some(Plain::Text(s)) => Some(s.parse()?),
            Some(other) => {
                return Err(DocError::InvalidReference {
                    reason: format!("referenced_id has type {}", other.type_name()),
                });
            }
        };

        let target_type = match map.get("referenced_type") {
            None | Some(Plain::Null) => String::new(),
            Some(Plain::Text(s)) => s.clone(),
            Some(other) => {
                return Err(DocError::InvalidReference {
                    reason: format!("referenced_type has type {}", other.type_name()),
                });
            }
        };

        let auto_load = match map.get("auto_load") {
            Some(Plain::Bool(b)) => *b,
            _ => false,
        };

        Ok(Reference {
            target_id,
            target_type,
            auto_load,
            resolved: None,
        })
    }
}

// The resolved target is a lookup association, not part of the reference's
// persisted state, so it is excluded from equality.
impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.target_id == other.target_id
            && self.target_type == other.target_type
            && self.auto_load == other.auto_load
    }
}

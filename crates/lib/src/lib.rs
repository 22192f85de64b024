//!
//! Overdoc: a change-tracked document model with minimal-diff persistence.
//! This library provides the in-memory object layer for applications that
//! edit structured documents locally and push partial updates to a
//! document store.
//!
//! ## Core Concepts
//!
//! * **Documents (`doc::Doc`)**: String-keyed map documents tracking all
//!   mutations against a committed baseline with an overlay and tombstones.
//! * **Lists (`doc::List`)**: Ordered documents tracked wholesale against a
//!   baseline snapshot.
//! * **Values (`doc::Value`)**: The variant over scalars, nested branches,
//!   and references; `apply()` commits pending changes recursively,
//!   `revert()` discards them.
//! * **Diffing (`diff`)**: Computes the minimal `$set`/`$unset` update that
//!   transforms a document's baseline into its current state, with dotted
//!   paths into unchanged subtrees.
//! * **Escaping (`escape`)**: Replaces the store's reserved key characters
//!   (`$`, `.`) with full-width analogs before documents cross the wire.
//! * **Registry (`registry::Registry`)**: Explicit mapping from `_type`
//!   tags to factories, so typed values such as references survive a
//!   round trip through plain documents.
//! * **Resolution (`resolve::Resolver`)**: Loads referenced documents
//!   through a pluggable [`Loader`], memoizing by id so shared targets are
//!   fetched once.

pub mod diff;
pub mod doc;
pub mod escape;
pub mod registry;
pub mod resolve;

// Re-export the core types for easier access.
pub use diff::{DiffError, Update};
pub use doc::{Doc, DocError, Field, Id, List, Plain, Reference, Value};
pub use registry::Registry;
pub use resolve::{Loader, Resolver};

/// Result type used throughout the Overdoc library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Overdoc library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured document errors from the doc module
    #[error(transparent)]
    Doc(doc::DocError),

    /// Structured diffing errors from the diff module
    #[error(transparent)]
    Diff(diff::DiffError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Doc(_) => "doc",
            Error::Diff(_) => "diff",
        }
    }

    /// Check if this error indicates a key or index was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Doc(doc_err) => doc_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a type mismatch.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Doc(doc_err) => doc_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }

    /// Check if this error is diff-related.
    pub fn is_diff_error(&self) -> bool {
        matches!(self, Error::Diff(_))
    }
}

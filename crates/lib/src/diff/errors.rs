//! Error types for the diff engine.

use thiserror::Error;

/// Structured error types for diffing and update application.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DiffError {
    /// Diffing was requested on something that is not a tracked document
    /// or list. This is a programmer error, not a recoverable condition.
    #[error("cannot diff a {actual} value, expected a document or list")]
    UnsupportedType { actual: &'static str },

    /// An update path could not be applied to a plain document.
    #[error("invalid update path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

// Conversion from DiffError to the main Error type
impl From<DiffError> for crate::Error {
    fn from(err: DiffError) -> Self {
        crate::Error::Diff(err)
    }
}

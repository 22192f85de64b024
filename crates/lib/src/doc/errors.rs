//! Error types for document operations.
//!
//! This module defines structured error types for the tracked document model:
//! key/index lookups, typed value access, and reference handling.

use thiserror::Error;

/// Structured error types for document operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DocError {
    /// A key was not present in the effective view of a map document
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// A list index was outside the current bounds
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A value had a different type than the caller expected
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A reference could not be assigned or reconstructed
    #[error("invalid reference: {reason}")]
    InvalidReference { reason: String },

    /// An opaque document id could not be parsed
    #[error("invalid id: {reason}")]
    InvalidId { reason: String },
}

impl DocError {
    /// Check if this error indicates a missing key or index
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocError::KeyNotFound { .. } | DocError::IndexOutOfBounds { .. }
        )
    }

    /// Check if this error is related to type mismatches
    pub fn is_type_error(&self) -> bool {
        matches!(self, DocError::TypeMismatch { .. })
    }

    /// Get the key if this is a key-related error
    pub fn key(&self) -> Option<&str> {
        match self {
            DocError::KeyNotFound { key } => Some(key),
            _ => None,
        }
    }
}

// Conversion from DocError to the main Error type
impl From<DocError> for crate::Error {
    fn from(err: DocError) -> Self {
        crate::Error::Doc(err)
    }
}

//! Errors raised while assembling input metadata.

use thiserror::Error;

use crate::DocumentId;

/// Errors raised while building model inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The same document appeared twice in document-order metadata.
    #[error("document {document} listed twice in document order (indices {first} and {second})")]
    DuplicateDocument {
        document: DocumentId,
        first: u32,
        second: u32,
    },
}

//! Error types for OpenAPI generation.

use thiserror::Error;

/// Errors that can occur during documentation generation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the document to JSON.
    #[error("Failed to serialize OpenAPI document: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Two routes document the same method and path.
    #[error("Duplicate operation {method} {path}")]
    DuplicateOperation {
        /// Lowercase method.
        method: String,
        /// OpenAPI path.
        path: String,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;

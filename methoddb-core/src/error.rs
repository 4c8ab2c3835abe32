//! Error types and result types for document store operations.
//!
//! Every fallible operation in the store returns [`DocumentStoreResult<T>`]. Nothing in
//! the store logs or retries a failure; errors travel back to the caller, which decides
//! how to report them (for an HTTP adapter, [`DocumentStoreError::is_client_error`]
//! separates `400` from `500` responses).

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

use crate::parser::QuerySyntaxError;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// The filter text could not be parsed.
    #[error(transparent)]
    QuerySyntax(#[from] QuerySyntaxError),
    /// A batch could not be fully committed to a collection. Nothing from the batch
    /// was stored.
    #[error("Storage error: {0}")]
    Storage(String),
    /// A document contains a field whose value is not a supported scalar, or the
    /// input is not an object.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// Serialization/deserialization error when converting to or from JSON. Caller
    /// input that is not a valid document is reported as
    /// [`DocumentStoreError::InvalidDocument`] instead, so this is a server-side failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DocumentStoreError {
    /// Returns `true` when the error was caused by the caller's input rather than by
    /// the store itself.
    pub fn is_client_error(&self) -> bool {
        match self {
            DocumentStoreError::QuerySyntax(_) | DocumentStoreError::InvalidDocument(_) => true,
            DocumentStoreError::Storage(_) | DocumentStoreError::Serialization(_) => false,
        }
    }
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

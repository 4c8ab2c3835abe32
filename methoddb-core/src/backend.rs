//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait is the seam between the store facade
//! ([`crate::store::DocumentStore`]) and the code that actually holds documents. A
//! backend owns one collection per name, assigns document ids, and evaluates parsed
//! [`Filter`]s. Backends are synchronous and never block on I/O.
//!
//! # Examples
//!
//! ```ignore
//! use methoddb_core::{backend::StoreBackend, document::Document, query::Filter};
//!
//! let backend = MyBackendImpl::new();
//!
//! let ids = backend.insert_documents("users", vec![Document::new().with("name", "Alice")])?;
//! let found = backend.query_documents("users", &Filter::eq("name", "Alice"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt::Debug;

use crate::{
    document::{Document, DocumentId},
    error::DocumentStoreResult,
    query::Filter,
};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Concurrent inserts into one collection must
/// never interleave their id assignment, and a query must observe a collection either
/// before or after a concurrent insert, never halfway through it.
pub trait StoreBackend: Send + Sync + Debug {
    /// Stores a batch of documents in a collection, creating the collection if needed.
    ///
    /// Each document receives the next id of its collection, in input order, and the ids
    /// are returned in that same order. The batch is committed as a whole: on failure
    /// none of its documents are stored.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Storage`](crate::error::DocumentStoreError::Storage)
    /// if the batch cannot be committed.
    fn insert_documents(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> DocumentStoreResult<Vec<DocumentId>>;

    /// Returns the documents of a collection that match `filter`, in ascending id order.
    ///
    /// A collection that does not exist yields no documents.
    fn query_documents(&self, collection: &str, filter: &Filter) -> DocumentStoreResult<Vec<Document>>;

    /// Returns the number of documents stored in a collection (zero if it does not exist).
    fn count_documents(&self, collection: &str) -> DocumentStoreResult<usize>;

    /// Creates an empty collection. Creating an existing collection is a no-op.
    fn create_collection(&self, name: &str) -> DocumentStoreResult<()>;

    /// Lists the names of all collections, sorted.
    fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;
}

/// Factory trait for backends that need configuration before use.
pub trait StoreBackendBuilder {
    /// The backend type this builder produces.
    type Backend: StoreBackend;

    /// Builds the backend.
    fn build(self) -> DocumentStoreResult<Self::Backend>;
}

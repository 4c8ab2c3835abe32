//! Collection-level interface for document operations.
//!
//! A [`Collection`] is a lightweight handle pairing a collection name with a backend.
//! Handles are cheap to create and hold no state of their own; the backend creates the
//! underlying collection the first time documents are inserted into it.
//!
//! # Example
//!
//! ```ignore
//! let users = store.collection("users");
//!
//! let ids = users.insert_many(vec![Document::new().with("username", "johnperry")])?;
//! let found = users.query(r#"{username:"johnperry"}"#)?;
//! ```

use tracing::debug;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentId},
    error::DocumentStoreResult,
    parser::parse,
    query::Filter,
};

/// A named collection bound to a backend.
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend> {
    name: String,
    backend: &'a B,
}

impl<'a, B: StoreBackend> Collection<'a, B> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a batch of documents and returns their ids in input order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the batch cannot be committed, in which case none of
    /// its documents are stored.
    #[tracing::instrument(level = "debug", skip_all, fields(collection = %self.name))]
    pub fn insert_many(&self, documents: Vec<Document>) -> DocumentStoreResult<Vec<DocumentId>> {
        let ids = self.backend.insert_documents(&self.name, documents)?;
        debug!(count = ids.len(), "inserted documents");

        Ok(ids)
    }

    /// Parses `filter_text` and returns the matching documents in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a query syntax error if `filter_text` is malformed. The collection is not
    /// touched in that case.
    #[tracing::instrument(level = "debug", skip_all, fields(collection = %self.name))]
    pub fn query(&self, filter_text: &str) -> DocumentStoreResult<Vec<Document>> {
        let filter = parse(filter_text)?;
        self.find(&filter)
    }

    /// Returns the documents matching an already parsed filter, in insertion order.
    pub fn find(&self, filter: &Filter) -> DocumentStoreResult<Vec<Document>> {
        let documents = self.backend.query_documents(&self.name, filter)?;
        debug!(%filter, matched = documents.len(), "queried documents");

        Ok(documents)
    }

    /// Returns the number of documents stored in this collection.
    pub fn count(&self) -> DocumentStoreResult<usize> {
        self.backend.count_documents(&self.name)
    }
}

//! Main document store interface.
//!
//! [`DocumentStore`] is the registry an API adapter holds on to: it owns a backend, hands
//! out [`Collection`] handles by name and exposes the two operations the adapter needs,
//! inserting a batch of documents and querying with filter text. The JSON variants
//! ([`DocumentStore::insert_json`], [`DocumentStore::query_json`]) accept and produce
//! the payloads of the HTTP contract:
//!
//! ```text
//! POST /api/v2/{collection}                  [{...}, {...}]  ->  [1, 2]
//! GET  /api/v2/{collection}?query={filter}                   ->  [{...}, ...]
//! ```
//!
//! # Example
//!
//! ```ignore
//! use methoddb::prelude::*;
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let ids = store.insert_json("users", serde_json::json!([{ "username": "johnperry" }]))?;
//! let found = store.query_json("users", Some(r#"{username:"johnperry"}"#))?;
//! ```

use crate::{
    backend::StoreBackend,
    collection::Collection,
    document::{Document, DocumentId},
    error::{DocumentStoreError, DocumentStoreResult},
    query::Filter,
};

/// Filter text used when a request carries no filter at all.
pub const MATCH_ALL: &str = "{}";

/// A document store bound to a specific backend implementation.
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gets a handle to the collection with the given name.
    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a, B> {
        Collection::new(name.to_string(), &self.backend)
    }

    /// Inserts a batch of documents into the named collection, creating it if needed.
    pub fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> DocumentStoreResult<Vec<DocumentId>> {
        self.collection(collection).insert_many(documents)
    }

    /// Parses `filter_text` and evaluates it against the named collection.
    pub fn query(&self, collection: &str, filter_text: &str) -> DocumentStoreResult<Vec<Document>> {
        self.collection(collection).query(filter_text)
    }

    /// Evaluates an already parsed filter against the named collection.
    pub fn find(&self, collection: &str, filter: &Filter) -> DocumentStoreResult<Vec<Document>> {
        self.collection(collection).find(filter)
    }

    /// Inserts a JSON array of objects into the named collection.
    ///
    /// Every element is converted before anything is stored, so a single invalid
    /// document rejects the whole request.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if `body` is not an array of
    /// objects with scalar fields, or a storage error if the batch cannot be committed.
    pub fn insert_json(
        &self,
        collection: &str,
        body: serde_json::Value,
    ) -> DocumentStoreResult<Vec<DocumentId>> {
        let serde_json::Value::Array(items) = body else {
            return Err(DocumentStoreError::InvalidDocument(
                "expected a JSON array of documents".to_string(),
            ));
        };

        let documents = items
            .into_iter()
            .map(Document::from_json)
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        self.insert_many(collection, documents)
    }

    /// Queries the named collection and returns the matches as a JSON array.
    ///
    /// A missing filter matches every document.
    pub fn query_json(
        &self,
        collection: &str,
        filter_text: Option<&str>,
    ) -> DocumentStoreResult<serde_json::Value> {
        let documents = self.query(collection, filter_text.unwrap_or(MATCH_ALL))?;

        Ok(serde_json::to_value(documents)?)
    }

    /// Creates an empty collection. Creating an existing collection is a no-op.
    pub fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.backend.create_collection(name)
    }

    /// Lists all collections in the store, sorted by name.
    pub fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        self.backend.list_collections()
    }
}

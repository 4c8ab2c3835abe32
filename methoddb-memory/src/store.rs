//! In-memory storage backend.
//!
//! [`InMemoryStore`] is the registry of named collections. Each collection is a
//! [`CollectionStore`] with its own lock and id sequence, so traffic on one collection
//! never waits on another; the registry lock is only held long enough to look a
//! collection up or create it.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use methoddb_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{Document, DocumentId},
    error::DocumentStoreResult,
    query::Filter,
};

use crate::{collection::CollectionStore, evaluator::execute};

type CollectionMap = HashMap<String, Arc<CollectionStore>>;

/// Settings applied to every collection the store creates.
///
/// Can be deserialized from configuration; missing keys take their defaults.
///
/// ```
/// use methoddb_memory::InMemoryStoreConfig;
///
/// let config: InMemoryStoreConfig = serde_json::from_str(r#"{"max_documents": 1000}"#).unwrap();
/// assert_eq!(config.max_documents, Some(1000));
/// assert_eq!(config.initial_capacity, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InMemoryStoreConfig {
    /// Number of documents to preallocate room for in each new collection.
    pub initial_capacity: usize,
    /// Maximum number of documents per collection. `None` means unbounded.
    pub max_documents: Option<usize>,
}

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable; clones share the same collections.
///
/// # Example
///
/// ```
/// use methoddb_core::{backend::StoreBackend, document::Document, query::Filter};
/// use methoddb_memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// let ids = store
///     .insert_documents("users", vec![Document::new().with("name", "Alice")])
///     .unwrap();
/// assert_eq!(ids, vec![1]);
///
/// let found = store.query_documents("users", &Filter::eq("name", "Alice")).unwrap();
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    collections: Arc<RwLock<CollectionMap>>,
    config: InMemoryStoreConfig,
}

impl InMemoryStore {
    /// Creates a new empty store with default settings.
    pub fn new() -> Self {
        Self::with_config(InMemoryStoreConfig::default())
    }

    pub fn with_config(config: InMemoryStoreConfig) -> Self {
        Self {
            collections: Arc::new(RwLock::new(CollectionMap::new())),
            config,
        }
    }

    /// Creates a builder for constructing an `InMemoryStore` with custom options.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    pub fn config(&self) -> &InMemoryStoreConfig {
        &self.config
    }

    /// Returns the named collection, if it exists.
    pub fn get_collection(&self, name: &str) -> Option<Arc<CollectionStore>> {
        self.collections.read().get(name).cloned()
    }

    /// Returns the named collection, creating it first if it does not exist.
    pub fn get_or_create_collection(&self, name: &str) -> Arc<CollectionStore> {
        if let Some(collection) = self.get_collection(name) {
            return collection;
        }

        let mut collections = self.collections.write();
        Arc::clone(collections.entry(name.to_string()).or_insert_with(|| {
            debug!(collection = name, "creating collection");
            Arc::new(CollectionStore::with_limits(
                name,
                self.config.initial_capacity,
                self.config.max_documents,
            ))
        }))
    }
}

impl StoreBackend for InMemoryStore {
    fn insert_documents(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> DocumentStoreResult<Vec<DocumentId>> {
        self.get_or_create_collection(collection)
            .insert_many(documents)
    }

    fn query_documents(&self, collection: &str, filter: &Filter) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .get_collection(collection)
            .map(|collection| execute(&collection, filter))
            .unwrap_or_default())
    }

    fn count_documents(&self, collection: &str) -> DocumentStoreResult<usize> {
        Ok(self
            .get_collection(collection)
            .map_or(0, |collection| collection.len()))
    }

    fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.get_or_create_collection(name);

        Ok(())
    }

    fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        let mut names: Vec<String> = self
            .collections
            .read()
            .keys()
            .cloned()
            .collect();
        names.sort();

        Ok(names)
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```
/// use methoddb_core::backend::StoreBackendBuilder;
/// use methoddb_memory::InMemoryStore;
///
/// let store = InMemoryStore::builder()
///     .initial_capacity(64)
///     .max_documents(10_000)
///     .build()
///     .unwrap();
/// assert_eq!(store.config().max_documents, Some(10_000));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStoreBuilder {
    config: InMemoryStoreConfig,
}

impl InMemoryStoreBuilder {
    /// Replaces all settings with `config`.
    pub fn config(mut self, config: InMemoryStoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Preallocates room for `capacity` documents in each new collection.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Caps every collection at `max` documents. A batch that would go past the cap is
    /// rejected as a whole.
    pub fn max_documents(mut self, max: usize) -> Self {
        self.config.max_documents = Some(max);
        self
    }
}

impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds a new [`InMemoryStore`]. This always succeeds.
    fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::with_config(self.config))
    }
}

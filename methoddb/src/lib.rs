//! Main methoddb crate providing a small in-memory JSON document store.
//!
//! This crate is the primary entry point. It re-exports the core types and the
//! in-memory backend:
//!
//! - **Documents** - Flat field-to-value records with strictly typed scalar values
//! - **Collections** - Named sets of documents with their own id sequences
//! - **Filters** - Exact-match queries written as `{field:literal,...}`
//!
//! # Quick Start
//!
//! ```
//! use methoddb::{prelude::*, memory::InMemoryStore};
//! use serde_json::json;
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//!
//! let ids = store
//!     .insert_json(
//!         "users",
//!         json!([
//!             { "username": "johnperry", "age": 75 },
//!             { "username": "louiswu", "age": 200 },
//!         ]),
//!     )
//!     .unwrap();
//! assert_eq!(ids, vec![1, 2]);
//!
//! let found = store
//!     .query_json("users", Some(r#"{username:"johnperry",age:75}"#))
//!     .unwrap();
//! assert_eq!(found, json!([{ "username": "johnperry", "age": 75 }]));
//! ```
//!
//! # Filter Syntax
//!
//! A filter is a brace-delimited, comma-separated list of `field:literal` bindings.
//! Field names are unquoted; literals are double-quoted strings, integers (`75`),
//! floats (`75.0`), `true`, `false` or `null`. All bindings must hold for a document to
//! match, and `{}` matches every document. Values only match values of the same type:
//! `{age:75}` does not match a stored `75.0`.

pub mod prelude;

pub use methoddb_core::{backend, collection, document, error, parser, query, store, value};

// Re-export serde_json for adapters building JSON payloads
pub use serde_json;

/// In-memory storage backend implementations.
pub mod memory {
    pub use methoddb_memory::{
        CollectionStore, InMemoryStore, InMemoryStoreBuilder, InMemoryStoreConfig, Scan, execute,
    };
}

//! In-memory document storage backend for methoddb.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend`
//! trait:
//!
//! - [`collection`] - A single collection: its documents and its id counter
//! - [`evaluator`] - Evaluation of parsed filters against a collection
//! - [`store`] - The registry of named collections and its builder
//!
//! # Quick Start
//!
//! ```
//! use methoddb_core::{backend::StoreBackend, document::Document, parser::parse};
//! use methoddb_memory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! let ids = store
//!     .insert_documents(
//!         "users",
//!         vec![
//!             Document::new().with("username", "johnperry").with("age", 75),
//!             Document::new().with("username", "louiswu").with("age", 200),
//!         ],
//!     )
//!     .unwrap();
//! assert_eq!(ids, vec![1, 2]);
//!
//! let filter = parse(r#"{username:"johnperry",age:75}"#).unwrap();
//! assert_eq!(store.query_documents("users", &filter).unwrap().len(), 1);
//! ```

#[allow(unused_extern_crates)]
extern crate self as methoddb_memory;

pub mod collection;
pub mod evaluator;
pub mod store;

pub use collection::{CollectionStore, Scan};
pub use evaluator::execute;
pub use store::{InMemoryStore, InMemoryStoreBuilder, InMemoryStoreConfig};

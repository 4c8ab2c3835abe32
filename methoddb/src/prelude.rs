//! Convenient re-exports of commonly used types from methoddb.
//!
//! ```ignore
//! use methoddb::prelude::*;
//! ```

pub use methoddb_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::Collection,
    document::{Document, DocumentId, StoredDocument},
    error::{DocumentStoreError, DocumentStoreResult},
    parser::{QuerySyntaxError, SyntaxErrorKind, parse},
    query::{Condition, Filter, FilterBuilder, FilterVisitor},
    store::{DocumentStore, MATCH_ALL},
    value::Value,
};

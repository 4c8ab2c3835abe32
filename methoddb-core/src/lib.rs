//! Core types and traits for the methoddb document store.
//!
//! This crate provides:
//!
//! - **Values and documents** ([`value`], [`document`]) - Tagged scalar values and flat documents
//! - **Filters** ([`query`]) - Equality filters and the visitor backends use to evaluate them
//! - **Filter parsing** ([`parser`]) - The `{field:literal,...}` text form
//! - **Store backend abstraction** ([`backend`]) - The trait storage implementations provide
//! - **Document store** ([`store`], [`collection`]) - The interface an API adapter calls
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```
//! use methoddb_core::{document::Document, parser::parse, value::Value};
//!
//! let document = Document::new()
//!     .with("username", "johnperry")
//!     .with("age", 75);
//!
//! let filter = parse(r#"{username:"johnperry",age:75}"#).unwrap();
//! assert!(filter
//!     .conditions()
//!     .iter()
//!     .all(|condition| document.get(&condition.field) == Some(&condition.value)));
//! assert_ne!(document.get("age"), Some(&Value::Float(75.0)));
//! ```

#[allow(unused_extern_crates)]
extern crate self as methoddb_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod parser;
pub mod query;
pub mod store;
pub mod value;

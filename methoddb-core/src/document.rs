//! Documents and stored documents.
//!
//! A [`Document`] is a flat mapping from field name to [`Value`]. Fields keep their
//! insertion order when serialized, but the order plays no part in equality. A document
//! has no identity until it is stored, at which point it becomes a [`StoredDocument`]
//! carrying the id its collection assigned.

use indexmap::{IndexMap, map};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{from_value, to_value};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    value::Value,
};

/// Identifier assigned to a document when it is stored. Ids start at 1.
pub type DocumentId = u64;

/// An ordered mapping of field names to scalar values.
///
/// # Example
///
/// ```
/// use methoddb_core::document::Document;
///
/// let mut document = Document::new();
/// document.insert("username", "johnperry");
/// document.insert("age", 75);
///
/// assert_eq!(document.get("age").and_then(|v| v.as_i64()), Some(75));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(IndexMap<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Sets a field, returning the previous value if the field was already present.
    /// A replaced field keeps its original position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Builder-style variant of [`Document::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the fields in insertion order.
    pub fn iter(&self) -> map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Converts a JSON object into a document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if `value` is not an object or
    /// if any field holds an array, an object or an integer outside the `i64` range.
    pub fn from_json(value: serde_json::Value) -> DocumentStoreResult<Self> {
        if !value.is_object() {
            return Err(DocumentStoreError::InvalidDocument(format!(
                "expected a JSON object, found {value}"
            )));
        }

        from_value(value).map_err(|err| DocumentStoreError::InvalidDocument(err.to_string()))
    }

    /// Converts this document into a JSON object.
    pub fn to_json(&self) -> DocumentStoreResult<serde_json::Value> {
        Ok(to_value(self)?)
    }

    /// Builds a document from any serializable type whose fields are all scalars.
    pub fn from_serializable<T: Serialize>(value: &T) -> DocumentStoreResult<Self> {
        Self::from_json(to_value(value)?)
    }

    /// Deserializes this document into a typed value.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> DocumentStoreResult<T> {
        Ok(from_value(to_value(self)?)?)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A document together with the id its collection assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    id: DocumentId,
    document: Document,
}

impl StoredDocument {
    pub fn new(id: DocumentId, document: Document) -> Self {
        Self { id, document }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

//! Filter evaluation for in-memory collections.
//!
//! A document matches a filter when every filtered field is present in the document and
//! holds a value of the same type and the same value. A missing field is simply a
//! non-match. Evaluation of a parsed filter cannot fail.

use std::convert::Infallible;

use methoddb_core::{
    document::{Document, StoredDocument},
    query::{Filter, FilterVisitor},
    value::Value,
};

use crate::collection::CollectionStore;

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, filter: &Filter) -> bool {
        let Ok(matched) = self.visit_filter(filter);
        matched
    }

    /// Returns copies of the documents matching `filter`, keeping the input order.
    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a StoredDocument>,
        filter: &Filter,
    ) -> Vec<Document> {
        documents
            .into_iter()
            .map(StoredDocument::document)
            .filter(|document| DocumentEvaluator::new(document).evaluate(filter))
            .cloned()
            .collect()
    }
}

impl FilterVisitor for DocumentEvaluator<'_> {
    type Error = Infallible;

    fn visit_condition(&mut self, field: &str, value: &Value) -> Result<bool, Self::Error> {
        Ok(self.document.get(field) == Some(value))
    }
}

/// Returns the documents of `collection` that match `filter`, in ascending id order.
///
/// Ids are not part of the result. Repeated calls against an unchanged collection
/// return the same documents in the same order.
pub fn execute(collection: &CollectionStore, filter: &Filter) -> Vec<Document> {
    let scan = collection.scan();
    DocumentEvaluator::filter_documents(&scan, filter)
}

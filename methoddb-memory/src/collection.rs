//! A single in-memory collection.
//!
//! [`CollectionStore`] keeps its documents in a vector ordered by id, next to the
//! counter that hands out ids. Both sit behind one `parking_lot::RwLock`, so an insert
//! assigns ids and appends its whole batch under the write lock while readers only
//! ever see complete batches.

use std::slice;

use parking_lot::{RwLock, RwLockReadGuard};

use methoddb_core::{
    document::{Document, DocumentId, StoredDocument},
    error::{DocumentStoreError, DocumentStoreResult},
};

#[derive(Debug)]
struct CollectionState {
    documents: Vec<StoredDocument>,
    next_id: DocumentId,
}

/// Documents of one collection, keyed by an auto-incrementing id starting at 1.
#[derive(Debug)]
pub struct CollectionStore {
    name: String,
    max_documents: Option<usize>,
    state: RwLock<CollectionState>,
}

impl CollectionStore {
    /// Creates an empty, unbounded collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_limits(name, 0, None)
    }

    /// Creates an empty collection with room for `initial_capacity` documents that
    /// refuses to grow past `max_documents`.
    pub fn with_limits(
        name: impl Into<String>,
        initial_capacity: usize,
        max_documents: Option<usize>,
    ) -> Self {
        let capacity = max_documents.map_or(initial_capacity, |max| initial_capacity.min(max));

        Self {
            name: name.into(),
            max_documents,
            state: RwLock::new(CollectionState {
                documents: Vec::with_capacity(capacity),
                next_id: 1,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.state.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores a batch of documents and returns the ids assigned to them, in input order.
    ///
    /// The batch is all or nothing: if it cannot be committed in full, the collection
    /// and its id counter are left exactly as they were.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Storage`] when the batch would exceed the
    /// collection's document limit, when the id space is exhausted, or when memory for
    /// the batch cannot be allocated.
    pub fn insert_many(&self, documents: Vec<Document>) -> DocumentStoreResult<Vec<DocumentId>> {
        let count = documents.len();
        let mut state = self.state.write();

        if let Some(max) = self.max_documents {
            if state.documents.len().saturating_add(count) > max {
                return Err(DocumentStoreError::Storage(format!(
                    "collection {} is limited to {max} documents, cannot add {count} more to {}",
                    self.name,
                    state.documents.len()
                )));
            }
        }

        let first = state.next_id;
        let next = DocumentId::try_from(count)
            .ok()
            .and_then(|count| first.checked_add(count))
            .ok_or_else(|| {
                DocumentStoreError::Storage(format!("collection {} ran out of document ids", self.name))
            })?;

        let mut ids = Vec::new();
        ids.try_reserve_exact(count)
            .and_then(|()| state.documents.try_reserve(count))
            .map_err(|err| {
                DocumentStoreError::Storage(format!(
                    "cannot allocate {count} documents in collection {}: {err}",
                    self.name
                ))
            })?;

        ids.extend(first..next);
        state.documents.extend(
            ids.iter()
                .zip(documents)
                .map(|(&id, document)| StoredDocument::new(id, document)),
        );
        state.next_id = next;

        Ok(ids)
    }

    /// Returns a read view over the stored documents.
    ///
    /// The view holds the collection's read lock until it is dropped: inserts into this
    /// collection wait for it, so do not insert from the same thread while holding one.
    pub fn scan(&self) -> Scan<'_> {
        Scan {
            state: self.state.read(),
        }
    }
}

/// A consistent, restartable view of a collection's documents in ascending id order.
pub struct Scan<'a> {
    state: RwLockReadGuard<'a, CollectionState>,
}

impl Scan<'_> {
    /// Iterates over the stored documents. Each call starts again from the first one.
    pub fn iter(&self) -> slice::Iter<'_, StoredDocument> {
        self.state.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.state.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.documents.is_empty()
    }
}

impl<'s> IntoIterator for &'s Scan<'_> {
    type Item = &'s StoredDocument;
    type IntoIter = slice::Iter<'s, StoredDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use methoddb_core::value::Value;
    use std::{sync::Arc, thread};

    fn user(name: &str) -> Document {
        Document::new().with("username", name)
    }

    #[test]
    fn ids_start_at_one_and_follow_input_order() {
        let collection = CollectionStore::new("users");
        let ids = collection
            .insert_many(vec![user("johnperry"), user("louiswu"), user("nessus")])
            .unwrap();
        assert_eq!(ids, vec![1, 2, 3]);

        let scan = collection.scan();
        let names: Vec<_> = scan
            .iter()
            .map(|stored| (stored.id(), stored.document().get("username").cloned()))
            .collect();
        assert_eq!(
            names,
            vec![
                (1, Some(Value::from("johnperry"))),
                (2, Some(Value::from("louiswu"))),
                (3, Some(Value::from("nessus"))),
            ]
        );
    }

    #[test]
    fn later_batches_continue_the_sequence() {
        let collection = CollectionStore::new("users");
        assert_eq!(collection.insert_many(vec![user("a"), user("b")]).unwrap(), vec![1, 2]);
        assert_eq!(collection.insert_many(vec![user("c")]).unwrap(), vec![3]);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn empty_batch_assigns_nothing() {
        let collection = CollectionStore::new("users");
        assert!(collection.insert_many(Vec::new()).unwrap().is_empty());
        assert_eq!(collection.insert_many(vec![user("a")]).unwrap(), vec![1]);
    }

    #[test]
    fn rejected_batch_leaves_no_trace() {
        let collection = CollectionStore::with_limits("users", 0, Some(3));
        collection.insert_many(vec![user("a"), user("b")]).unwrap();

        let err = collection
            .insert_many(vec![user("c"), user("d")])
            .unwrap_err();
        assert!(matches!(err, DocumentStoreError::Storage(_)));
        assert_eq!(collection.len(), 2);

        assert_eq!(collection.insert_many(vec![user("c")]).unwrap(), vec![3]);
    }

    #[test]
    fn exhausted_id_space_rejects_the_batch() {
        let collection = CollectionStore::new("users");
        collection.state.write().next_id = DocumentId::MAX - 1;

        let err = collection
            .insert_many(vec![user("a"), user("b")])
            .unwrap_err();
        assert!(matches!(err, DocumentStoreError::Storage(_)));
        assert_eq!(collection.len(), 0);
        assert_eq!(collection.state.read().next_id, DocumentId::MAX - 1);

        assert_eq!(
            collection.insert_many(vec![user("a")]).unwrap(),
            vec![DocumentId::MAX - 1]
        );
    }

    #[test]
    fn scan_is_restartable() {
        let collection = CollectionStore::new("users");
        collection.insert_many(vec![user("a"), user("b")]).unwrap();

        let scan = collection.scan();
        assert_eq!(scan.iter().count(), 2);
        assert_eq!((&scan).into_iter().count(), 2);
        assert_eq!(scan.len(), 2);
    }

    #[test]
    fn concurrent_inserts_never_share_ids() {
        let collection = Arc::new(CollectionStore::new("events"));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let collection = Arc::clone(&collection);
                thread::spawn(move || {
                    let mut ids = Vec::new();
                    for batch in 0..25 {
                        let documents = (0..4)
                            .map(|i| {
                                Document::new()
                                    .with("worker", worker)
                                    .with("seq", batch * 4 + i)
                            })
                            .collect();
                        let assigned = collection.insert_many(documents).unwrap();
                        // ids within one batch are contiguous
                        assert!(assigned.windows(2).all(|w| w[1] == w[0] + 1));
                        ids.extend(assigned);
                    }
                    ids
                })
            })
            .collect();

        let mut all: Vec<DocumentId> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (1..=800).collect::<Vec<DocumentId>>());

        let scan = collection.scan();
        assert!(scan.iter().zip(1 as DocumentId..).all(|(stored, id)| stored.id() == id));
    }
}

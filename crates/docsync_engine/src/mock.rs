//! In-memory source and index for testing.

use crate::error::{SyncError, SyncResult};
use crate::index::IndexWriter;
use crate::source::DocumentSource;
use docsync_protocol::{DocumentList, EnqueuedTask, PageRequest, Record};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An in-memory collection with cursor pagination.
///
/// Documents are served in insertion order. A cursor that matches no
/// document yields an empty page.
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: Vec<Record>,
    requests: RwLock<Vec<PageRequest>>,
    fail_on_fetch: Option<usize>,
}

impl MemorySource {
    /// Creates a source serving `documents`.
    pub fn new(documents: Vec<Record>) -> Self {
        Self {
            documents,
            requests: RwLock::new(Vec::new()),
            fail_on_fetch: None,
        }
    }

    /// Makes the fetch with this zero-based call number fail.
    pub fn fail_on_fetch(mut self, call: usize) -> Self {
        self.fail_on_fetch = Some(call);
        self
    }

    /// Number of fetches so far, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.requests.read().len()
    }

    /// Every page request received, in order.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.read().clone()
    }
}

impl DocumentSource for MemorySource {
    fn list_documents(&self, request: &PageRequest) -> SyncResult<DocumentList> {
        let call = {
            let mut requests = self.requests.write();
            requests.push(request.clone());
            requests.len() - 1
        };

        if self.fail_on_fetch == Some(call) {
            return Err(SyncError::SourceFetch {
                message: format!("injected failure on fetch {call}"),
                status: Some(503),
            });
        }

        let start = match &request.cursor_after {
            None => 0,
            Some(cursor) => match self
                .documents
                .iter()
                .position(|doc| doc.id() == Some(cursor.as_str()))
            {
                Some(position) => position + 1,
                None => self.documents.len(),
            },
        };

        let page = self
            .documents
            .iter()
            .skip(start)
            .take(request.limit as usize)
            .cloned()
            .collect();

        Ok(DocumentList::new(self.documents.len() as u64, page))
    }
}

/// An in-memory index with upsert semantics.
///
/// Keeps every submitted batch and the resulting document set keyed by
/// primary key. A failed submission leaves both untouched.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    batches: RwLock<Vec<Vec<Record>>>,
    documents: RwLock<BTreeMap<String, Record>>,
    calls: AtomicUsize,
    fail_on_batch: Option<usize>,
}

impl MemoryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the submission with this zero-based call number fail.
    pub fn fail_on_batch(mut self, call: usize) -> Self {
        self.fail_on_batch = Some(call);
        self
    }

    /// Number of submissions so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Accepted batches, in order.
    pub fn batches(&self) -> Vec<Vec<Record>> {
        self.batches.read().clone()
    }

    /// Current index contents keyed by primary key.
    pub fn documents(&self) -> BTreeMap<String, Record> {
        self.documents.read().clone()
    }

    /// Number of distinct documents in the index.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true if nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl IndexWriter for MemoryIndex {
    fn add_documents(&self, documents: &[Record], primary_key: &str) -> SyncResult<EnqueuedTask> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_batch == Some(call) {
            return Err(SyncError::IndexWrite {
                message: format!("injected failure on batch {call}"),
                status: Some(500),
            });
        }

        let mut keyed = Vec::with_capacity(documents.len());
        for (position, doc) in documents.iter().enumerate() {
            let key = doc
                .get(primary_key)
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    SyncError::index_write(format!(
                        "document at position {position} has no string `{primary_key}`"
                    ))
                })?;
            keyed.push((key.to_string(), doc.clone()));
        }

        self.documents.write().extend(keyed);
        self.batches.write().push(documents.to_vec());

        Ok(EnqueuedTask {
            task_uid: call as u64,
            index_uid: None,
            status: "enqueued".into(),
            kind: "documentAdditionOrUpdate".into(),
            enqueued_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(n: usize) -> Vec<Record> {
        (0..n).map(|i| Record::with_id(format!("d{i:03}"))).collect()
    }

    #[test]
    fn source_pages_after_cursor() {
        let source = MemorySource::new(docs(5));

        let first = source.list_documents(&PageRequest::new(2)).unwrap();
        assert_eq!(first.next_cursor().unwrap(), Some("d001"));

        let second = source
            .list_documents(&PageRequest::new(2).after("d001"))
            .unwrap();
        assert_eq!(second.documents[0].id(), Some("d002"));

        let tail = source
            .list_documents(&PageRequest::new(2).after("d004"))
            .unwrap();
        assert!(tail.is_empty());
        assert_eq!(source.fetch_count(), 3);
    }

    #[test]
    fn source_injected_failure() {
        let source = MemorySource::new(docs(1)).fail_on_fetch(0);
        assert!(source.list_documents(&PageRequest::default()).is_err());
        assert!(source.list_documents(&PageRequest::default()).is_ok());
    }

    #[test]
    fn index_upserts_by_primary_key() {
        let index = MemoryIndex::new();
        index
            .add_documents(&[Record::with_id("a").with_field("v", 1)], "$id")
            .unwrap();
        index
            .add_documents(&[Record::with_id("a").with_field("v", 2)], "$id")
            .unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.batches().len(), 2);
        assert_eq!(
            index.documents()["a"].get("v"),
            Some(&serde_json::json!(2))
        );
    }

    #[test]
    fn index_injected_failure_keeps_state() {
        let index = MemoryIndex::new().fail_on_batch(1);
        index.add_documents(&docs(2), "$id").unwrap();
        assert!(index.add_documents(&docs(3), "$id").is_err());

        assert_eq!(index.call_count(), 2);
        assert_eq!(index.batches().len(), 1);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn index_rejects_missing_primary_key() {
        let index = MemoryIndex::new();
        let err = index
            .add_documents(&[Record::new().with_field("title", "t")], "$id")
            .unwrap_err();
        assert!(matches!(err, SyncError::IndexWrite { .. }));
        assert!(index.is_empty());
    }
}

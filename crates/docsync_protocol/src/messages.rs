//! Response bodies exchanged with the document database and the index.

use crate::error::{ProtocolError, ProtocolResult};
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// A page of documents returned by the source collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    /// Total number of documents in the collection.
    #[serde(default)]
    pub total: u64,
    /// Documents in this page, in source order.
    #[serde(default)]
    pub documents: Vec<Record>,
}

impl DocumentList {
    /// Creates a page from records.
    pub fn new(total: u64, documents: Vec<Record>) -> Self {
        Self { total, documents }
    }

    /// Returns true if the page holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of documents in the page.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns the continuation cursor: the `$id` of the last document.
    ///
    /// Returns `Ok(None)` for an empty page.
    pub fn next_cursor(&self) -> ProtocolResult<Option<&str>> {
        match self.documents.last() {
            None => Ok(None),
            Some(last) => last.id().map(Some).ok_or(ProtocolError::MissingId {
                position: self.documents.len() - 1,
            }),
        }
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Encodes a batch of records as a JSON array.
pub fn encode_batch(records: &[Record]) -> ProtocolResult<Vec<u8>> {
    Ok(serde_json::to_vec(records)?)
}

/// Summary of an asynchronous index task, returned by a document upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueuedTask {
    /// Task identifier.
    pub task_uid: u64,
    /// Index the task targets.
    #[serde(default)]
    pub index_uid: Option<String>,
    /// Task status, usually `enqueued`.
    #[serde(default)]
    pub status: String,
    /// Task kind, e.g. `documentAdditionOrUpdate`.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Enqueue timestamp as reported by the index.
    #[serde(default)]
    pub enqueued_at: Option<String>,
}

impl EnqueuedTask {
    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Error object returned by either service on a non-2xx response.
///
/// Both services put a human-readable `message` at the top level; the
/// remaining fields differ and are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable message.
    pub message: String,
    /// Service-specific error type.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ApiErrorBody {
    /// Builds a readable description of a failed response body.
    ///
    /// Uses the service `message` when the body is a JSON error object,
    /// otherwise the raw body text.
    pub fn describe(body: &[u8]) -> String {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(parsed) => match parsed.kind {
                Some(kind) => format!("{} ({})", parsed.message, kind),
                None => parsed.message,
            },
            Err(_) => String::from_utf8_lossy(body).trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_document_list() {
        let body = br#"{"total":2,"documents":[{"$id":"a","x":1},{"$id":"b"}]}"#;
        let list = DocumentList::decode(body).unwrap();
        assert_eq!(list.total, 2);
        assert_eq!(list.len(), 2);
        assert_eq!(list.next_cursor().unwrap(), Some("b"));
    }

    #[test]
    fn empty_list_has_no_cursor() {
        let list = DocumentList::decode(br#"{"total":0,"documents":[]}"#).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.next_cursor().unwrap(), None);
    }

    #[test]
    fn last_document_without_id_is_an_error() {
        let list = DocumentList::decode(br#"{"documents":[{"$id":"a"},{"title":"t"}]}"#).unwrap();
        assert!(matches!(
            list.next_cursor(),
            Err(ProtocolError::MissingId { position: 1 })
        ));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            DocumentList::decode(b"<html>"),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn decode_enqueued_task() {
        let body = br#"{"taskUid":12,"indexUid":"docs","status":"enqueued","type":"documentAdditionOrUpdate","enqueuedAt":"2024-01-15T00:00:00Z"}"#;
        let task = EnqueuedTask::decode(body).unwrap();
        assert_eq!(task.task_uid, 12);
        assert_eq!(task.index_uid.as_deref(), Some("docs"));
        assert_eq!(task.kind, "documentAdditionOrUpdate");
    }

    #[test]
    fn batch_is_a_json_array() {
        let batch = vec![Record::with_id("a"), Record::with_id("b")];
        let bytes = encode_batch(&batch).unwrap();
        assert_eq!(bytes, br#"[{"$id":"a"},{"$id":"b"}]"#.to_vec());
    }

    #[test]
    fn describe_error_bodies() {
        let body = br#"{"message":"The index `docs` was not found.","code":"index_not_found","type":"invalid_request"}"#;
        assert_eq!(
            ApiErrorBody::describe(body),
            "The index `docs` was not found. (invalid_request)"
        );

        let body = br#"{"message":"Missing scope","code":401,"version":"1.5.0"}"#;
        assert_eq!(ApiErrorBody::describe(body), "Missing scope");

        assert_eq!(ApiErrorBody::describe(b"bad gateway\n"), "bad gateway");
    }
}

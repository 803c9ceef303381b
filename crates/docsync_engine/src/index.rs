//! Index writer: the search index receiving transformed batches.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::{HttpClient, HttpRequest};
use docsync_protocol::{encode_batch, ApiErrorBody, EnqueuedTask, Record};
use tracing::debug;

/// A search index accepting create-or-replace batches.
pub trait IndexWriter: Send + Sync {
    /// Upserts `documents`, keyed by the `primary_key` field.
    fn add_documents(&self, documents: &[Record], primary_key: &str) -> SyncResult<EnqueuedTask>;
}

impl<T: IndexWriter + ?Sized> IndexWriter for &T {
    fn add_documents(&self, documents: &[Record], primary_key: &str) -> SyncResult<EnqueuedTask> {
        (**self).add_documents(documents, primary_key)
    }
}

/// Meilisearch-style REST index.
///
/// Posts batches to `{endpoint}/indexes/{index}/documents?primaryKey=…`
/// with the admin key as a bearer token. The index applies the batch
/// asynchronously; a 2xx answer means the task was enqueued.
pub struct MeilisearchIndex<C: HttpClient> {
    endpoint: String,
    index_name: String,
    api_key: String,
    client: C,
}

impl<C: HttpClient> MeilisearchIndex<C> {
    /// Creates a writer for the index named in `config`.
    pub fn new(config: &SyncConfig, client: C) -> Self {
        Self {
            endpoint: config.search_endpoint.trim_end_matches('/').to_string(),
            index_name: config.search_index_name.clone(),
            api_key: config.search_admin_key.clone(),
            client,
        }
    }

    /// Returns the documents URL of the index.
    pub fn documents_url(&self) -> String {
        format!("{}/indexes/{}/documents", self.endpoint, self.index_name)
    }
}

impl<C: HttpClient> IndexWriter for MeilisearchIndex<C> {
    fn add_documents(&self, documents: &[Record], primary_key: &str) -> SyncResult<EnqueuedTask> {
        let body = encode_batch(documents)
            .map_err(|e| SyncError::index_write(format!("unencodable batch: {e}")))?;

        let request = HttpRequest::post(self.documents_url(), body)
            .with_query("primaryKey", primary_key)
            .with_header("Authorization", format!("Bearer {}", self.api_key))
            .with_header("Content-Type", "application/json");

        let response = self
            .client
            .execute(request)
            .map_err(SyncError::index_write)?;

        if !response.is_success() {
            return Err(SyncError::IndexWrite {
                message: format!(
                    "HTTP {}: {}",
                    response.status,
                    ApiErrorBody::describe(&response.body)
                ),
                status: Some(response.status),
            });
        }

        let task = EnqueuedTask::decode(&response.body).map_err(|e| SyncError::IndexWrite {
            message: format!("undecodable task summary: {e}"),
            status: Some(response.status),
        })?;

        debug!(
            index = %self.index_name,
            task_uid = task.task_uid,
            documents = documents.len(),
            "batch enqueued"
        );

        Ok(task)
    }
}

//! Document source: the collection being mirrored into the index.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::{HttpClient, HttpRequest};
use docsync_protocol::{ApiErrorBody, DocumentList, PageRequest};
use tracing::debug;

/// A paginated document collection.
///
/// Implementations must return documents strictly after
/// `request.cursor_after` and never more than `request.limit` of them.
pub trait DocumentSource: Send + Sync {
    /// Fetches one page of documents.
    fn list_documents(&self, request: &PageRequest) -> SyncResult<DocumentList>;
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn list_documents(&self, request: &PageRequest) -> SyncResult<DocumentList> {
        (**self).list_documents(request)
    }
}

/// Appwrite-style REST document database.
///
/// Lists documents with
/// `GET {endpoint}/databases/{db}/collections/{collection}/documents`,
/// passing each query as a JSON-encoded `queries[]` parameter.
pub struct AppwriteSource<C: HttpClient> {
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
    collection_id: String,
    client: C,
}

impl<C: HttpClient> AppwriteSource<C> {
    /// Creates a source for the collection named in `config`.
    ///
    /// `api_key` is the caller's admin credential. Fails with a
    /// configuration error when the source endpoint or project is missing.
    pub fn new(config: &SyncConfig, api_key: impl Into<String>, client: C) -> SyncResult<Self> {
        let settings = config.source_settings()?;
        Ok(Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            project_id: settings.project_id,
            api_key: api_key.into(),
            database_id: config.database_id.clone(),
            collection_id: config.collection_id.clone(),
            client,
        })
    }

    /// Returns the list-documents URL.
    pub fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        )
    }

    fn build_request(&self, request: &PageRequest) -> HttpRequest {
        request.queries().iter().fold(
            HttpRequest::get(self.documents_url())
                .with_header("X-Appwrite-Project", &self.project_id)
                .with_header("X-Appwrite-Key", &self.api_key),
            |http, query| http.with_query("queries[]", query.to_json()),
        )
    }
}

impl<C: HttpClient> DocumentSource for AppwriteSource<C> {
    fn list_documents(&self, request: &PageRequest) -> SyncResult<DocumentList> {
        debug!(
            collection = %self.collection_id,
            limit = request.limit,
            cursor = ?request.cursor_after,
            "listing documents"
        );

        let response = self
            .client
            .execute(self.build_request(request))
            .map_err(SyncError::source_fetch)?;

        if !response.is_success() {
            return Err(SyncError::SourceFetch {
                message: format!(
                    "HTTP {}: {}",
                    response.status,
                    ApiErrorBody::describe(&response.body)
                ),
                status: Some(response.status),
            });
        }

        DocumentList::decode(&response.body).map_err(|e| SyncError::SourceFetch {
            message: format!("undecodable document list: {e}"),
            status: Some(response.status),
        })
    }
}

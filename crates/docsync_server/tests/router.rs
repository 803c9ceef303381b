//! Router tests driving the full HTTP stack in process.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use docsync_engine::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use docsync_protocol::{DocumentList, Record};
use docsync_server::{ServerConfig, SyncServer, VarSource};
use docsync_testkit::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Serves a fixed collection and accepts every index write.
struct Backend {
    documents: Vec<Record>,
    calls: AtomicUsize,
    indexed: Mutex<Vec<String>>,
}

impl Backend {
    fn new(documents: Vec<Record>) -> Arc<Self> {
        Arc::new(Self {
            documents,
            calls: AtomicUsize::new(0),
            indexed: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpClient for Backend {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match request.method {
            HttpMethod::Get => {
                let start = request
                    .query_values("queries[]")
                    .into_iter()
                    .filter_map(|q| serde_json::from_str::<serde_json::Value>(q).ok())
                    .find(|q| q["method"] == "cursorAfter")
                    .and_then(|q| q["values"][0].as_str().map(str::to_string))
                    .and_then(|cursor| {
                        self.documents
                            .iter()
                            .position(|d| d.id() == Some(cursor.as_str()))
                    })
                    .map_or(0, |p| p + 1);
                let page: Vec<Record> =
                    self.documents.iter().skip(start).take(100).cloned().collect();
                let body = DocumentList::new(self.documents.len() as u64, page)
                    .encode()
                    .unwrap();
                Ok(HttpResponse::new(200, body))
            }
            HttpMethod::Post => {
                let batch: Vec<Record> =
                    serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
                self.indexed
                    .lock()
                    .unwrap()
                    .extend(batch.iter().filter_map(|r| r.id().map(str::to_string)));
                let task = json!({
                    "taskUid": 1,
                    "indexUid": "posts",
                    "status": "enqueued",
                    "type": "documentAdditionOrUpdate",
                    "enqueuedAt": "2024-01-15T00:00:00Z"
                });
                Ok(HttpResponse::new(202, task.to_string()))
            }
        }
    }
}

fn router(dir: &StaticDir, vars: HashMap<String, String>, backend: &Arc<Backend>) -> Router {
    let config = ServerConfig::default().with_static_dir(dir.path());
    SyncServer::with_client(config, VarSource::Fixed(vars), Arc::clone(backend)).router()
}

fn request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(uri)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn get_serves_rendered_page() {
    let dir = StaticDir::with_search_page();
    let backend = Backend::new(Vec::new());

    let response = router(&dir, sync_vars(), &backend)
        .oneshot(request("GET", "/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let page = body_text(response).await;
    assert!(page.contains("http://search.test:7700"));
    assert!(page.contains("public-key"));
    assert!(!page.contains("admin-key"));
    assert!(!page.contains("{{"));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn any_path_reaches_the_handler() {
    let dir = StaticDir::with_search_page();
    let backend = Backend::new(Vec::new());

    let response = router(&dir, sync_vars(), &backend)
        .oneshot(request("GET", "/some/deep/path?q=1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn post_runs_full_sync() {
    let dir = StaticDir::empty();
    let backend = Backend::new(numbered_records(150));

    let response = router(&dir, sync_vars(), &backend)
        .oneshot(
            request("POST", "/")
                .header("x-appwrite-key", "caller-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Sync finished.");
    // Two pages, one empty terminator, two index writes.
    assert_eq!(backend.calls(), 5);
    assert_eq!(backend.indexed.lock().unwrap().len(), 150);
}

#[tokio::test]
async fn post_without_credential_is_rejected() {
    let dir = StaticDir::empty();
    let backend = Backend::new(numbered_records(3));

    let response = router(&dir, sync_vars(), &backend)
        .oneshot(request("POST", "/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(response).await.contains("x-appwrite-key"));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn missing_config_fails_every_method_without_network() {
    let dir = StaticDir::with_search_page();
    let backend = Backend::new(numbered_records(3));
    let vars = sync_vars_without(&["DATABASE_ID", "SEARCH_ADMIN_KEY"]);

    for method in ["GET", "POST", "DELETE"] {
        let response = router(&dir, vars.clone(), &backend)
            .oneshot(
                request(method, "/")
                    .header("x-appwrite-key", "caller-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.contains("DATABASE_ID"));
        assert!(body.contains("SEARCH_ADMIN_KEY"));
    }
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn missing_template_is_a_server_error() {
    let dir = StaticDir::empty();
    let backend = Backend::new(Vec::new());

    let response = router(&dir, sync_vars(), &backend)
        .oneshot(request("GET", "/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("index.html"));
}

#[tokio::test]
async fn malformed_date_aborts_sync() {
    let dir = StaticDir::empty();
    let backend = Backend::new(vec![dated_record("bad", "not a date")]);

    let response = router(&dir, sync_vars(), &backend)
        .oneshot(
            request("PATCH", "/")
                .header("x-appwrite-key", "caller-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("bad"));
    assert!(backend.indexed.lock().unwrap().is_empty());
}

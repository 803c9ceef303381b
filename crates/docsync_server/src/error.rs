//! Error types for the HTTP front end.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use docsync_engine::{ConfigError, SyncError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving a request.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Required settings are missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The page template is not on disk.
    #[error("resource not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    /// The sync path was invoked without a document database credential.
    #[error("missing credential: request header {0} is required")]
    MissingCredential(String),

    /// The sync run failed.
    #[error("sync failed: {0}")]
    Sync(SyncError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SyncError> for ServerError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Configuration(config) => ServerError::Configuration(config),
            other => ServerError::Sync(other),
        }
    }
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServerError::MissingCredential(_))
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MissingCredential(_) => StatusCode::UNAUTHORIZED,
            ServerError::Sync(SyncError::SourceFetch { .. } | SyncError::IndexWrite { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

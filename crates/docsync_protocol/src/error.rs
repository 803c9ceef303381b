//! Error types for the protocol crate.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while encoding or decoding wire bodies.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The body was not valid JSON or did not match the expected shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A document was expected to be a JSON object.
    #[error("document is not a JSON object")]
    NotAnObject,

    /// A document in a page carries no `$id`.
    #[error("document at position {position} has no `$id`")]
    MissingId {
        /// Zero-based position in the page.
        position: usize,
    },
}

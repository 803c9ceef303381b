//! Error types for the sync engine.

use docsync_protocol::ProtocolError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Configuration problems detected before any I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required variables are absent or empty.
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<String>),

    /// An optional variable is present but cannot be used.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Returns the names of the missing variables, if any.
    pub fn missing(&self) -> &[String] {
        match self {
            ConfigError::Missing(names) => names,
            ConfigError::Invalid { .. } => &[],
        }
    }
}

/// Errors that abort a sync run.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Required settings are missing or invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The document database call failed.
    #[error("source fetch failed: {message}")]
    SourceFetch {
        /// Error message.
        message: String,
        /// HTTP status, when the service answered.
        status: Option<u16>,
    },

    /// The index rejected or never received a batch.
    #[error("index write failed: {message}")]
    IndexWrite {
        /// Error message.
        message: String,
        /// HTTP status, when the service answered.
        status: Option<u16>,
    },

    /// A `datePosted` value could not be parsed.
    #[error("malformed datePosted {value} in document {record_id}: {reason}")]
    MalformedDate {
        /// `$id` of the offending document.
        record_id: String,
        /// The raw value, as JSON.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The source kept returning pages past the configured bound.
    #[error("page limit exceeded after {pages} pages without reaching the end")]
    PageLimitExceeded {
        /// Number of pages fetched.
        pages: u64,
    },

    /// A fetched page violated the wire contract.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The HTTP client could not be built.
    #[error("http client error: {0}")]
    Transport(String),
}

impl SyncError {
    /// Creates a source fetch error without a status.
    pub fn source_fetch(message: impl Into<String>) -> Self {
        Self::SourceFetch {
            message: message.into(),
            status: None,
        }
    }

    /// Creates an index write error without a status.
    pub fn index_write(message: impl Into<String>) -> Self {
        Self::IndexWrite {
            message: message.into(),
            status: None,
        }
    }

    /// Returns true if the error was raised before any network activity.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SyncError::Configuration(_))
    }

    /// Returns the HTTP status reported by a remote service, if any.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            SyncError::SourceFetch { status, .. } | SyncError::IndexWrite { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lists_every_name() {
        let err = ConfigError::Missing(vec!["DATABASE_ID".into(), "SEARCH_ENDPOINT".into()]);
        assert_eq!(
            err.to_string(),
            "missing required configuration: DATABASE_ID, SEARCH_ENDPOINT"
        );
        assert_eq!(err.missing().len(), 2);
    }

    #[test]
    fn configuration_is_transparent() {
        let err = SyncError::from(ConfigError::Missing(vec!["COLLECTION_ID".into()]));
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "missing required configuration: COLLECTION_ID"
        );
    }

    #[test]
    fn remote_status() {
        let err = SyncError::IndexWrite {
            message: "index not found".into(),
            status: Some(404),
        };
        assert_eq!(err.remote_status(), Some(404));
        assert_eq!(SyncError::source_fetch("reset").remote_status(), None);
        assert!(!err.is_configuration());
    }

    #[test]
    fn error_display() {
        let err = SyncError::MalformedDate {
            record_id: "doc-1".into(),
            value: "\"yesterday\"".into(),
            reason: "unrecognized date format".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("doc-1"));
        assert!(msg.contains("yesterday"));

        let err = SyncError::PageLimitExceeded { pages: 5 };
        assert!(err.to_string().contains('5'));
    }
}

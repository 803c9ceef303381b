//! # docsync Protocol
//!
//! Wire types and JSON codecs for the docsync bridge.
//!
//! This crate provides:
//! - `Record`, the opaque document moved from the source to the index
//! - `PageRequest` and `Query` for cursor pagination against the source
//! - `DocumentList` and `EnqueuedTask` response bodies
//! - `ApiErrorBody` for extracting service error messages
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod error;
mod messages;
mod query;
mod record;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{encode_batch, ApiErrorBody, DocumentList, EnqueuedTask};
pub use query::{PageRequest, Query, MAX_PAGE_SIZE};
pub use record::{Record, DATE_POSTED_FIELD, ID_FIELD};

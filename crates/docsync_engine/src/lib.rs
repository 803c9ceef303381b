//! # docsync Engine
//!
//! Full-resync engine for docsync.
//!
//! This crate provides:
//! - The configuration guard and the explicit `SyncConfig`
//! - The pure `datePosted` transform
//! - HTTP clients for the document database and the search index
//! - The cursor pagination driver (`SyncEngine`)
//! - In-memory source and index fakes for tests
//!
//! ## Architecture
//!
//! One run is a strictly sequential loop:
//! 1. Fetch a page of at most 100 documents after the current cursor
//! 2. Stop when the page is empty
//! 3. Transform the page and upsert it into the index
//! 4. Advance the cursor to the last document's `$id`
//!
//! ## Key Invariants
//!
//! - Every run re-reads the whole collection; no state survives a run
//! - Batch N is upserted before batch N+1 is fetched
//! - Any fetch, transform or upsert failure aborts the run without retry
//! - Batches written before a failure stay in the index

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod http;
mod index;
mod mock;
mod source;
mod state;
mod transform;

pub use config::{
    env_snapshot, require_vars, SourceSettings, SyncConfig, COLLECTION_ID, DATABASE_ID,
    DEFAULT_MAX_PAGES, REQUIRED_VARS, SEARCH_ADMIN_KEY, SEARCH_ENDPOINT, SEARCH_INDEX_NAME,
    SEARCH_PUBLIC_KEY, SOURCE_ENDPOINT, SOURCE_PROJECT_ID, SOURCE_VARS, SYNC_MAX_PAGES,
    SYNC_PAGE_SIZE,
};
pub use error::{ConfigError, SyncError, SyncResult};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, ReqwestClient};
pub use index::{IndexWriter, MeilisearchIndex};
pub use mock::{MemoryIndex, MemorySource};
pub use source::{AppwriteSource, DocumentSource};
pub use state::{PaginationState, SyncEngine, SyncReport};
pub use transform::{parse_timestamp, transform_page, transform_record};

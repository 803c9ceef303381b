//! Pagination driver for a full resync.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::index::IndexWriter;
use crate::source::DocumentSource;
use crate::transform::transform_page;
use docsync_protocol::PageRequest;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where the driver is in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    /// Fetching the page after `cursor`; `None` is the first page.
    Fetching {
        /// `$id` of the last document already synced.
        cursor: Option<String>,
    },
    /// An empty page was returned; the run is complete.
    Done,
}

impl PaginationState {
    /// The state a run starts in.
    pub fn start() -> Self {
        PaginationState::Fetching { cursor: None }
    }

    /// Returns true once the source is exhausted.
    pub fn is_done(&self) -> bool {
        matches!(self, PaginationState::Done)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Fetch calls made, including the terminating empty page.
    pub fetches: u64,
    /// Batches upserted into the index.
    pub batches: u64,
    /// Documents upserted into the index.
    pub documents: u64,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

/// Drives one full resync from a source into an index.
///
/// The driver holds no state between runs: every call to [`run`](Self::run)
/// starts from the first page.
pub struct SyncEngine<S: DocumentSource, W: IndexWriter> {
    config: SyncConfig,
    source: S,
    index: W,
}

impl<S: DocumentSource, W: IndexWriter> SyncEngine<S, W> {
    /// Creates a new sync engine.
    pub fn new(config: SyncConfig, source: S, index: W) -> Self {
        Self {
            config,
            source,
            index,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the index writer.
    pub fn index(&self) -> &W {
        &self.index
    }

    /// Runs a full resync until the source returns an empty page.
    ///
    /// Any failure aborts the run; batches upserted before the failure
    /// remain in the index.
    pub fn run(&self) -> SyncResult<SyncReport> {
        let start = Instant::now();
        let mut report = SyncReport::default();
        let mut state = PaginationState::start();

        info!(
            collection = %self.config.collection_id,
            index = %self.config.search_index_name,
            page_size = self.config.page_size,
            "starting full resync"
        );

        while let PaginationState::Fetching { cursor } = state {
            if report.fetches >= self.config.max_pages {
                warn!(
                    pages = report.fetches,
                    "source never returned an empty page, aborting"
                );
                return Err(SyncError::PageLimitExceeded {
                    pages: report.fetches,
                });
            }

            state = match self.step(cursor, &mut report) {
                Ok(next) => next,
                Err(e) => {
                    warn!(error = %e, fetches = report.fetches, batches = report.batches, "sync aborted");
                    return Err(e);
                }
            };
        }

        report.duration = start.elapsed();
        info!(
            documents = report.documents,
            batches = report.batches,
            elapsed_ms = report.duration.as_millis() as u64,
            "Sync finished."
        );

        Ok(report)
    }

    /// Fetches, transforms and upserts one page.
    fn step(&self, cursor: Option<String>, report: &mut SyncReport) -> SyncResult<PaginationState> {
        let mut request = PageRequest::new(self.config.page_size);
        if let Some(cursor) = cursor {
            request = request.after(cursor);
        }

        let page = self.source.list_documents(&request)?;
        report.fetches += 1;

        let next_cursor = match page.next_cursor()? {
            Some(id) => id.to_string(),
            None => {
                info!("No more documents found.");
                return Ok(PaginationState::Done);
            }
        };
        debug!(cursor = %next_cursor, total = page.total, "fetched page");

        let batch = transform_page(&page.documents)?;

        info!("Syncing chunk of {} documents ...", batch.len());
        self.index.add_documents(&batch, &self.config.primary_key)?;

        report.batches += 1;
        report.documents += batch.len() as u64;

        Ok(PaginationState::Fetching {
            cursor: Some(next_cursor),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MemoryIndex, MemorySource};
    use docsync_protocol::{DocumentList, Record, DATE_POSTED_FIELD};
    use serde_json::json;

    fn config() -> SyncConfig {
        SyncConfig::new("db", "posts", "http://search", "docs", "admin", "pub")
    }

    fn docs(n: usize) -> Vec<Record> {
        (0..n).map(|i| Record::with_id(format!("d{i:04}"))).collect()
    }

    /// A source that ignores the cursor and always returns the same page.
    struct StuckSource;

    impl DocumentSource for StuckSource {
        fn list_documents(&self, _request: &PageRequest) -> SyncResult<DocumentList> {
            Ok(DocumentList::new(1, vec![Record::with_id("same")]))
        }
    }

    #[test]
    fn pagination_state() {
        assert!(!PaginationState::start().is_done());
        assert!(PaginationState::Done.is_done());
    }

    #[test]
    fn empty_collection() {
        let engine = SyncEngine::new(config(), MemorySource::new(Vec::new()), MemoryIndex::new());
        let report = engine.run().unwrap();

        assert_eq!(report.fetches, 1);
        assert_eq!(report.batches, 0);
        assert_eq!(engine.source().fetch_count(), 1);
        assert_eq!(engine.index().call_count(), 0);
    }

    #[test]
    fn cursor_follows_last_id() {
        let engine = SyncEngine::new(
            config().with_page_size(2),
            MemorySource::new(docs(5)),
            MemoryIndex::new(),
        );
        let report = engine.run().unwrap();
        assert_eq!(report.fetches, 4);
        assert_eq!(report.documents, 5);

        let cursors: Vec<Option<String>> = engine
            .source()
            .requests()
            .into_iter()
            .map(|r| r.cursor_after)
            .collect();
        assert_eq!(
            cursors,
            vec![
                None,
                Some("d0001".to_string()),
                Some("d0003".to_string()),
                Some("d0004".to_string())
            ]
        );
        assert!(engine.source().requests().iter().all(|r| r.limit == 2));
    }

    #[test]
    fn dates_are_normalized_before_upsert() {
        let source = MemorySource::new(vec![
            Record::with_id("a").with_field(DATE_POSTED_FIELD, "2024-01-15T00:00:00.000Z"),
            Record::with_id("b"),
        ]);
        let engine = SyncEngine::new(config(), source, MemoryIndex::new());
        engine.run().unwrap();

        let indexed = engine.index().documents();
        assert_eq!(indexed["a"].get(DATE_POSTED_FIELD), Some(&json!(1705276800)));
        assert_eq!(indexed["b"], Record::with_id("b"));
    }

    #[test]
    fn malformed_date_aborts_before_upsert() {
        let source = MemorySource::new(vec![
            Record::with_id("a"),
            Record::with_id("b").with_field(DATE_POSTED_FIELD, "not a date"),
        ]);
        let engine = SyncEngine::new(config(), source, MemoryIndex::new());

        let err = engine.run().unwrap_err();
        assert!(matches!(err, SyncError::MalformedDate { .. }));
        assert_eq!(engine.index().call_count(), 0);
    }

    #[test]
    fn fetch_failure_is_fatal() {
        let engine = SyncEngine::new(
            config().with_page_size(1),
            MemorySource::new(docs(3)).fail_on_fetch(1),
            MemoryIndex::new(),
        );
        let err = engine.run().unwrap_err();

        assert!(matches!(err, SyncError::SourceFetch { .. }));
        assert_eq!(engine.source().fetch_count(), 2);
        assert_eq!(engine.index().len(), 1);
    }

    #[test]
    fn page_bound_stops_a_stuck_source() {
        let engine = SyncEngine::new(config().with_max_pages(3), StuckSource, MemoryIndex::new());
        let err = engine.run().unwrap_err();

        assert!(matches!(err, SyncError::PageLimitExceeded { pages: 3 }));
        assert_eq!(engine.index().call_count(), 3);
    }

    #[test]
    fn document_without_id_is_a_protocol_error() {
        struct NoIdSource;
        impl DocumentSource for NoIdSource {
            fn list_documents(&self, _request: &PageRequest) -> SyncResult<DocumentList> {
                Ok(DocumentList::new(1, vec![Record::new().with_field("title", "x")]))
            }
        }

        let engine = SyncEngine::new(config(), NoIdSource, MemoryIndex::new());
        assert!(matches!(engine.run(), Err(SyncError::Protocol(_))));
    }

    #[test]
    fn runs_are_independent() {
        let index = MemoryIndex::new();
        let source = MemorySource::new(docs(3));
        let engine = SyncEngine::new(config(), &source, &index);

        engine.run().unwrap();
        engine.run().unwrap();

        // Each run starts over from the first page.
        let firsts = source
            .requests()
            .iter()
            .filter(|r| r.cursor_after.is_none())
            .count();
        assert_eq!(firsts, 2);
        assert_eq!(index.batches().len(), 2);
        assert_eq!(index.len(), 3);
    }
}

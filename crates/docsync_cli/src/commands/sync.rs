//! Sync command implementation.

use docsync_engine::{
    AppwriteSource, MeilisearchIndex, ReqwestClient, SyncConfig, SyncEngine, SyncReport,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Summary of a completed run.
#[derive(Debug, Serialize)]
pub struct SyncSummary {
    /// Collection read from.
    pub collection: String,
    /// Index written to.
    pub index: String,
    /// Fetch calls, including the terminating empty page.
    pub fetches: u64,
    /// Batches upserted.
    pub batches: u64,
    /// Documents upserted.
    pub documents: u64,
    /// Wall-clock duration in milliseconds.
    pub elapsed_ms: u64,
}

impl SyncSummary {
    fn new(config: &SyncConfig, report: &SyncReport) -> Self {
        Self {
            collection: config.collection_id.clone(),
            index: config.search_index_name.clone(),
            fetches: report.fetches,
            batches: report.batches,
            documents: report.documents,
            elapsed_ms: report.duration.as_millis() as u64,
        }
    }
}

/// Runs one full resync with the given document database key.
pub fn run(admin_key: Option<&str>, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = SyncConfig::from_env()?;
    config.source_settings()?;
    let admin_key = admin_key
        .filter(|key| !key.is_empty())
        .ok_or("Document database key required: pass --admin-key or set SOURCE_ADMIN_KEY")?;

    info!(
        "Syncing collection {} into index {}",
        config.collection_id, config.search_index_name
    );

    let client = Arc::new(ReqwestClient::new());
    let source = AppwriteSource::new(&config, admin_key, Arc::clone(&client))?;
    let index = MeilisearchIndex::new(&config, client);
    let report = SyncEngine::new(config.clone(), source, index).run()?;

    let summary = SyncSummary::new(&config, &report);
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => {
            print_text_output(&summary);
        }
    }

    Ok(())
}

fn print_text_output(summary: &SyncSummary) {
    println!("✓ Sync finished.");
    println!("  Collection: {}", summary.collection);
    println!("  Index: {}", summary.index);
    println!("  Documents: {}", summary.documents);
    println!("  Batches: {}", summary.batches);
    println!("  Fetches: {}", summary.fetches);
    println!("  Elapsed: {} ms", summary.elapsed_ms);
}

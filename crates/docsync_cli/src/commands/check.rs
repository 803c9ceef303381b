//! Check command implementation.

use docsync_engine::{env_snapshot, SyncConfig};
use serde::Serialize;
use std::collections::HashMap;

/// Effective configuration, with secrets masked.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    /// Source database id.
    pub database_id: String,
    /// Source collection id.
    pub collection_id: String,
    /// Search service base URL.
    pub search_endpoint: String,
    /// Target index name.
    pub search_index_name: String,
    /// Index write key, masked.
    pub search_admin_key: String,
    /// Search-only key, masked.
    pub search_public_key: String,
    /// Document database API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_endpoint: Option<String>,
    /// Document database project id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_project_id: Option<String>,
    /// Documents requested per page.
    pub page_size: u32,
    /// Bound on pages per run.
    pub max_pages: u64,
}

/// Validates the environment and prints the effective configuration.
pub fn run(require_source: bool, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = check(&env_snapshot(), require_source)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn check(
    vars: &HashMap<String, String>,
    require_source: bool,
) -> Result<CheckResult, Box<dyn std::error::Error>> {
    let config = SyncConfig::from_vars(vars)?;
    if require_source {
        config.source_settings()?;
    }

    Ok(CheckResult {
        database_id: config.database_id,
        collection_id: config.collection_id,
        search_endpoint: config.search_endpoint,
        search_index_name: config.search_index_name,
        search_admin_key: mask(&config.search_admin_key),
        search_public_key: mask(&config.search_public_key),
        source_endpoint: config.source_endpoint,
        source_project_id: config.source_project_id,
        page_size: config.page_size,
        max_pages: config.max_pages,
    })
}

/// Keeps the first four characters of a secret.
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if visible.len() == secret.len() {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

fn print_text_output(result: &CheckResult) {
    println!("✓ Configuration is complete");
    println!();
    println!("Source");
    println!("------");
    println!("  Database: {}", result.database_id);
    println!("  Collection: {}", result.collection_id);
    println!(
        "  Endpoint: {}",
        result.source_endpoint.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  Project: {}",
        result.source_project_id.as_deref().unwrap_or("(not set)")
    );
    println!();
    println!("Search");
    println!("------");
    println!("  Endpoint: {}", result.search_endpoint);
    println!("  Index: {}", result.search_index_name);
    println!("  Admin key: {}", result.search_admin_key);
    println!("  Public key: {}", result.search_public_key);
    println!();
    println!("Paging");
    println!("------");
    println!("  Page size: {}", result.page_size);
    println!("  Max pages: {}", result.max_pages);
}

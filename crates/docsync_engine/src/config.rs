//! Configuration for the sync engine.
//!
//! Settings are read from a variable map once per invocation and carried
//! in an explicit [`SyncConfig`]; nothing below this module reads the
//! process environment.

use crate::error::ConfigError;
use docsync_protocol::{ID_FIELD, MAX_PAGE_SIZE};
use std::collections::HashMap;

/// Source database id.
pub const DATABASE_ID: &str = "DATABASE_ID";
/// Source collection id.
pub const COLLECTION_ID: &str = "COLLECTION_ID";
/// Search service base URL.
pub const SEARCH_ENDPOINT: &str = "SEARCH_ENDPOINT";
/// Target index name.
pub const SEARCH_INDEX_NAME: &str = "SEARCH_INDEX_NAME";
/// Key allowed to write documents into the index.
pub const SEARCH_ADMIN_KEY: &str = "SEARCH_ADMIN_KEY";
/// Search-only key handed to browsers.
pub const SEARCH_PUBLIC_KEY: &str = "SEARCH_PUBLIC_KEY";
/// Document database API base URL.
pub const SOURCE_ENDPOINT: &str = "SOURCE_ENDPOINT";
/// Document database project id.
pub const SOURCE_PROJECT_ID: &str = "SOURCE_PROJECT_ID";
/// Optional page size override.
pub const SYNC_PAGE_SIZE: &str = "SYNC_PAGE_SIZE";
/// Optional bound on fetched pages per run.
pub const SYNC_MAX_PAGES: &str = "SYNC_MAX_PAGES";

/// Variables every invocation needs, whichever path it takes.
pub const REQUIRED_VARS: [&str; 6] = [
    DATABASE_ID,
    COLLECTION_ID,
    SEARCH_ENDPOINT,
    SEARCH_INDEX_NAME,
    SEARCH_ADMIN_KEY,
    SEARCH_PUBLIC_KEY,
];

/// Variables the sync path needs on top of [`REQUIRED_VARS`].
pub const SOURCE_VARS: [&str; 2] = [SOURCE_ENDPOINT, SOURCE_PROJECT_ID];

/// Default bound on pages fetched in one run.
pub const DEFAULT_MAX_PAGES: u64 = 100_000;

/// Fails with every name in `names` that is absent or empty in `vars`.
pub fn require_vars(vars: &HashMap<String, String>, names: &[&str]) -> Result<(), ConfigError> {
    let missing: Vec<String> = names
        .iter()
        .filter(|name| vars.get(**name).map_or(true, |value| value.is_empty()))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Missing(missing))
    }
}

/// Snapshot of the process environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn env_snapshot() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Connection settings for the document database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    /// API base URL, e.g. `https://cloud.appwrite.io/v1`.
    pub endpoint: String,
    /// Project id sent with every request.
    pub project_id: String,
}

/// Configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Source database id.
    pub database_id: String,
    /// Source collection id.
    pub collection_id: String,
    /// Search service base URL.
    pub search_endpoint: String,
    /// Target index name.
    pub search_index_name: String,
    /// Index write key.
    pub search_admin_key: String,
    /// Search-only key.
    pub search_public_key: String,
    /// Document database API base URL (sync path only).
    pub source_endpoint: Option<String>,
    /// Document database project id (sync path only).
    pub source_project_id: Option<String>,
    /// Documents requested per page.
    pub page_size: u32,
    /// Maximum number of pages fetched in one run.
    pub max_pages: u64,
    /// Field used as the index primary key.
    pub primary_key: String,
}

impl SyncConfig {
    /// Creates a configuration with default pagination settings.
    pub fn new(
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
        search_endpoint: impl Into<String>,
        search_index_name: impl Into<String>,
        search_admin_key: impl Into<String>,
        search_public_key: impl Into<String>,
    ) -> Self {
        Self {
            database_id: database_id.into(),
            collection_id: collection_id.into(),
            search_endpoint: search_endpoint.into(),
            search_index_name: search_index_name.into(),
            search_admin_key: search_admin_key.into(),
            search_public_key: search_public_key.into(),
            source_endpoint: None,
            source_project_id: None,
            page_size: MAX_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            primary_key: ID_FIELD.to_string(),
        }
    }

    /// Builds a configuration from a variable map.
    ///
    /// Fails with every missing name from [`REQUIRED_VARS`] at once.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        require_vars(vars, &REQUIRED_VARS)?;

        let get = |name: &str| vars.get(name).cloned().unwrap_or_default();
        let optional = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();

        let mut config = Self::new(
            get(DATABASE_ID),
            get(COLLECTION_ID),
            get(SEARCH_ENDPOINT),
            get(SEARCH_INDEX_NAME),
            get(SEARCH_ADMIN_KEY),
            get(SEARCH_PUBLIC_KEY),
        );
        config.source_endpoint = optional(SOURCE_ENDPOINT);
        config.source_project_id = optional(SOURCE_PROJECT_ID);

        if let Some(raw) = optional(SYNC_PAGE_SIZE) {
            let size = parse_positive(SYNC_PAGE_SIZE, &raw)?;
            config.page_size = u32::try_from(size)
                .unwrap_or(MAX_PAGE_SIZE)
                .min(MAX_PAGE_SIZE);
        }
        if let Some(raw) = optional(SYNC_MAX_PAGES) {
            config.max_pages = parse_positive(SYNC_MAX_PAGES, &raw)?;
        }

        Ok(config)
    }

    /// Builds a configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env_snapshot())
    }

    /// Sets the document database connection.
    pub fn with_source(mut self, endpoint: impl Into<String>, project_id: impl Into<String>) -> Self {
        self.source_endpoint = Some(endpoint.into());
        self.source_project_id = Some(project_id.into());
        self
    }

    /// Sets the page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Sets the maximum number of pages fetched per run.
    pub fn with_max_pages(mut self, pages: u64) -> Self {
        self.max_pages = pages.max(1);
        self
    }

    /// Sets the index primary key field.
    pub fn with_primary_key(mut self, field: impl Into<String>) -> Self {
        self.primary_key = field.into();
        self
    }

    /// Returns the document database connection, failing with every
    /// missing name from [`SOURCE_VARS`].
    pub fn source_settings(&self) -> Result<SourceSettings, ConfigError> {
        match (&self.source_endpoint, &self.source_project_id) {
            (Some(endpoint), Some(project_id)) => Ok(SourceSettings {
                endpoint: endpoint.clone(),
                project_id: project_id.clone(),
            }),
            (endpoint, project_id) => {
                let mut missing = Vec::new();
                if endpoint.is_none() {
                    missing.push(SOURCE_ENDPOINT.to_string());
                }
                if project_id.is_none() {
                    missing.push(SOURCE_PROJECT_ID.to_string());
                }
                Err(ConfigError::Missing(missing))
            }
        }
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            name: name.to_string(),
            reason: "must be at least 1".into(),
        }),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::Invalid {
            name: name.to_string(),
            reason: format!("{raw:?} is not a positive integer ({e})"),
        }),
    }
}

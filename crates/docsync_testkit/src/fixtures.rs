//! Test fixtures.
//!
//! Records, configuration maps and static directories for tests that
//! exercise the sync engine and the HTTP server.

use docsync_protocol::{Record, DATE_POSTED_FIELD};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A page template using all three public placeholders.
pub const SEARCH_PAGE_TEMPLATE: &str = r#"<!doctype html>
<html>
<head><title>Search</title></head>
<body>
<script>
  const endpoint = "{{SEARCH_ENDPOINT}}";
  const indexName = "{{SEARCH_INDEX_NAME}}";
  const apiKey = "{{SEARCH_PUBLIC_KEY}}";
</script>
</body>
</html>
"#;

/// Returns `n` records with ids `doc-00000`, `doc-00001`, … in order.
pub fn numbered_records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record::with_id(format!("doc-{i:05}")).with_field("title", format!("Document {i}")))
        .collect()
}

/// Returns a record carrying a `datePosted` value.
pub fn dated_record(id: &str, date: impl Into<serde_json::Value>) -> Record {
    Record::with_id(id)
        .with_field("title", format!("Post {id}"))
        .with_field(DATE_POSTED_FIELD, date)
}

/// Returns a variable map holding every setting both request paths need.
pub fn sync_vars() -> HashMap<String, String> {
    [
        ("DATABASE_ID", "main"),
        ("COLLECTION_ID", "posts"),
        ("SEARCH_ENDPOINT", "http://search.test:7700"),
        ("SEARCH_INDEX_NAME", "posts"),
        ("SEARCH_ADMIN_KEY", "admin-key"),
        ("SEARCH_PUBLIC_KEY", "public-key"),
        ("SOURCE_ENDPOINT", "http://db.test/v1"),
        ("SOURCE_PROJECT_ID", "project"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Returns [`sync_vars`] without the named variables.
pub fn sync_vars_without(names: &[&str]) -> HashMap<String, String> {
    let mut vars = sync_vars();
    for name in names {
        vars.remove(*name);
    }
    vars
}

/// A temporary static directory with automatic cleanup.
pub struct StaticDir {
    dir: TempDir,
}

impl StaticDir {
    /// Creates an empty directory.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a directory holding `index.html` with [`SEARCH_PAGE_TEMPLATE`].
    pub fn with_search_page() -> Self {
        Self::with_file("index.html", SEARCH_PAGE_TEMPLATE)
    }

    /// Creates a directory holding a single file.
    pub fn with_file(name: &str, contents: &str) -> Self {
        let dir = Self::empty();
        std::fs::write(dir.path().join(name), contents).expect("Failed to write template");
        dir
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns an owned copy of the directory path.
    pub fn path_buf(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}

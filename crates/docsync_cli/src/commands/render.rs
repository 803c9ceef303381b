//! Render command implementation.

use docsync_engine::SyncConfig;
use docsync_server::{page_values, PageRenderer, DEFAULT_TEMPLATE};
use std::path::Path;
use tracing::info;

/// Renders the search page to `output`, or stdout when absent.
pub fn run(static_dir: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = SyncConfig::from_env()?;
    let page = PageRenderer::new(static_dir).render(DEFAULT_TEMPLATE, &page_values(&config))?;

    match output {
        Some(path) => {
            std::fs::write(path, &page)?;
            info!("Wrote {} bytes to {:?}", page.len(), path);
        }
        None => print!("{page}"),
    }

    Ok(())
}

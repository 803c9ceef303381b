//! Serve command implementation.

use docsync_server::{ServerConfig, SyncServer};
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;

/// Runs the HTTP server until Ctrl-C.
pub fn run(bind: SocketAddr, static_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::new(bind).with_static_dir(static_dir);
    info!("Serving {:?} on {}", config.static_dir, bind);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        SyncServer::new(config)
            .run(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("shutdown requested");
                }
            })
            .await
    })?;

    Ok(())
}

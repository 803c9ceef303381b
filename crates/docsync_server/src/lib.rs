//! # docsync Server
//!
//! HTTP front end for the docsync bridge.
//!
//! This crate provides:
//! - The page renderer (static template + `{{NAME}}` interpolation)
//! - The request handler that guards configuration and branches on method
//! - An axum server exposing both paths on every route
//!
//! # Request paths
//!
//! 1. Every invocation builds a fresh `SyncConfig` from the variable
//!    source; missing settings fail before any network call
//! 2. `GET`/`HEAD` render the search page with the public settings
//! 3. Any other method runs a full resync and answers `Sync finished.`
//!
//! ```rust,ignore
//! use docsync_server::{ServerConfig, SyncServer};
//!
//! let server = SyncServer::new(ServerConfig::default());
//! server.run(async { tokio::signal::ctrl_c().await.ok(); }).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod server;
mod template;

pub use config::{ServerConfig, DEFAULT_ADMIN_KEY_HEADER, DEFAULT_TEMPLATE};
pub use error::{ServerError, ServerResult};
pub use handler::{page_values, HandlerContext, Invocation, Reply, RequestHandler, VarSource};
pub use server::SyncServer;
pub use template::{interpolate, PageRenderer, HTML_CONTENT_TYPE};

//! Request handling for the page and sync paths.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::template::{PageRenderer, HTML_CONTENT_TYPE};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use docsync_engine::{
    env_snapshot, AppwriteSource, HttpClient, MeilisearchIndex, SyncConfig, SyncEngine,
    SyncReport, SEARCH_ENDPOINT, SEARCH_INDEX_NAME, SEARCH_PUBLIC_KEY,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Body returned after a successful sync.
pub const SYNC_FINISHED: &str = "Sync finished.";

/// Where configuration variables are read from on each request.
#[derive(Debug, Clone)]
pub enum VarSource {
    /// The process environment, read afresh every time.
    Process,
    /// A fixed map.
    Fixed(HashMap<String, String>),
}

impl VarSource {
    /// Returns the current variables.
    pub fn snapshot(&self) -> HashMap<String, String> {
        match self {
            VarSource::Process => env_snapshot(),
            VarSource::Fixed(vars) => vars.clone(),
        }
    }
}

/// Context for request handling.
#[derive(Debug)]
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    vars: VarSource,
    renderer: PageRenderer,
}

impl HandlerContext {
    /// Creates a context reading variables from the process environment.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_vars(config, VarSource::Process)
    }

    /// Creates a context with an explicit variable source.
    pub fn with_vars(config: ServerConfig, vars: VarSource) -> Self {
        let renderer = PageRenderer::new(config.static_dir.clone());
        Self {
            config,
            vars,
            renderer,
        }
    }

    /// Returns the page renderer.
    pub fn renderer(&self) -> &PageRenderer {
        &self.renderer
    }
}

/// One incoming request, reduced to what the handler branches on.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// HTTP method.
    pub method: Method,
    /// Document database credential supplied by the caller.
    pub admin_key: Option<String>,
}

impl Invocation {
    /// Creates an invocation without a credential.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            admin_key: None,
        }
    }

    /// Attaches the caller's credential.
    pub fn with_admin_key(mut self, key: impl Into<String>) -> Self {
        self.admin_key = Some(key.into());
        self
    }

    /// Returns true for methods that render the page.
    pub fn is_read_only(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }
}

/// Successful outcome of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Rendered search page.
    Page(String),
    /// A full resync completed.
    SyncFinished(SyncReport),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Page(body) => {
                (StatusCode::OK, [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], body).into_response()
            }
            Reply::SyncFinished(_) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                SYNC_FINISHED,
            )
                .into_response(),
        }
    }
}

/// Returns the placeholder values for the search page.
///
/// Only the public key is exposed; the admin key never reaches a page.
pub fn page_values(config: &SyncConfig) -> HashMap<String, String> {
    HashMap::from([
        (SEARCH_ENDPOINT.to_string(), config.search_endpoint.clone()),
        (SEARCH_INDEX_NAME.to_string(), config.search_index_name.clone()),
        (SEARCH_PUBLIC_KEY.to_string(), config.search_public_key.clone()),
    ])
}

/// Handler for both request paths.
pub struct RequestHandler<C: HttpClient> {
    context: Arc<HandlerContext>,
    client: Arc<C>,
}

impl<C: HttpClient> RequestHandler<C> {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>, client: Arc<C>) -> Self {
        Self { context, client }
    }

    /// Returns the handler context.
    pub fn context(&self) -> &HandlerContext {
        &self.context
    }

    /// Handles one invocation.
    ///
    /// Configuration is validated before anything else, on every path.
    pub fn handle(&self, invocation: &Invocation) -> ServerResult<Reply> {
        let config = SyncConfig::from_vars(&self.context.vars.snapshot())?;

        if invocation.is_read_only() {
            self.handle_page(&config)
        } else {
            self.handle_sync(&config, invocation.admin_key.as_deref())
        }
    }

    /// Renders the search page.
    pub fn handle_page(&self, config: &SyncConfig) -> ServerResult<Reply> {
        let page = self
            .context
            .renderer
            .render(&self.context.config.template, &page_values(config))?;
        debug!(bytes = page.len(), "serving search page");
        Ok(Reply::Page(page))
    }

    /// Runs a full resync with the caller's credential.
    pub fn handle_sync(&self, config: &SyncConfig, admin_key: Option<&str>) -> ServerResult<Reply> {
        config.source_settings()?;
        let admin_key = admin_key.filter(|key| !key.is_empty()).ok_or_else(|| {
            ServerError::MissingCredential(self.context.config.admin_key_header.clone())
        })?;

        let source = AppwriteSource::new(config, admin_key, Arc::clone(&self.client))?;
        let index = MeilisearchIndex::new(config, Arc::clone(&self.client));
        let report = SyncEngine::new(config.clone(), source, index).run()?;

        info!(documents = report.documents, "sync request completed");
        Ok(Reply::SyncFinished(report))
    }
}

//! Main sync server.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{HandlerContext, Invocation, RequestHandler, VarSource};
use axum::extract::State;
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Response};
use axum::Router;
use docsync_engine::{HttpClient, ReqwestClient};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// The sync server.
///
/// Every path and method reaches the same handler: `GET`/`HEAD` render the
/// search page, anything else triggers a full resync. Each request runs
/// on the blocking pool since the sync driver is synchronous.
///
/// # Example
///
/// ```no_run
/// use docsync_server::{ServerConfig, SyncServer};
///
/// # async fn serve() -> docsync_server::ServerResult<()> {
/// let server = SyncServer::new(ServerConfig::default());
/// server.run(std::future::pending()).await
/// # }
/// ```
pub struct SyncServer<C: HttpClient + 'static> {
    handler: Arc<RequestHandler<C>>,
}

impl SyncServer<ReqwestClient> {
    /// Creates a server reading configuration from the process environment.
    pub fn new(config: ServerConfig) -> Self {
        let context = Arc::new(HandlerContext::new(config));
        Self::with_handler(RequestHandler::new(context, Arc::new(ReqwestClient::new())))
    }
}

impl<C: HttpClient + 'static> SyncServer<C> {
    /// Creates a server around an existing handler.
    pub fn with_handler(handler: RequestHandler<C>) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Creates a server with a fixed variable map and HTTP client.
    pub fn with_client(config: ServerConfig, vars: VarSource, client: Arc<C>) -> Self {
        let context = Arc::new(HandlerContext::with_vars(config, vars));
        Self::with_handler(RequestHandler::new(context, client))
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.handler.context().config
    }

    /// Builds the router; every route falls through to the handler.
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(dispatch::<C>)
            .with_state(Arc::clone(&self.handler))
            .layer(TraceLayer::new_for_http())
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config().bind_addr).await?;
        info!(addr = %listener.local_addr()?, "docsync server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        // A blocking HTTP client must not be dropped on an async worker.
        let handler = self.handler;
        tokio::task::spawn_blocking(move || drop(handler))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        info!("docsync server stopped");
        Ok(())
    }
}

async fn dispatch<C: HttpClient + 'static>(
    State(handler): State<Arc<RequestHandler<C>>>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let admin_key = headers
        .get(handler.context().config.admin_key_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let invocation = Invocation { method, admin_key };

    let outcome = tokio::task::spawn_blocking(move || handler.handle(&invocation))
        .await
        .unwrap_or_else(|e| Err(ServerError::Internal(e.to_string())));

    match outcome {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            warn!(error = %e, status = %e.status_code(), "request failed");
            e.into_response()
        }
    }
}

//! HTTP transport for the RPC dispatcher

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::error::{DatePredictionError, Result};
use crate::rpc::MethodRegistry;

/// Plain-text body returned for an undecodable request
pub const INVALID_JSON_BODY: &str = "Invalid JSON";

#[derive(Clone)]
struct AppState {
    registry: Arc<MethodRegistry>,
}

/// JSON-RPC over HTTP server
pub struct RpcServer {
    config: ServerConfig,
    registry: Arc<MethodRegistry>,
}

impl RpcServer {
    /// Create a server around an existing registry
    pub fn new(config: ServerConfig, registry: MethodRegistry) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
        }
    }

    /// Create a server with the built-in methods
    pub fn from_config(config: ServerConfig) -> Self {
        let registry = MethodRegistry::with_defaults(config.param_policy);
        Self::new(config, registry)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<MethodRegistry> {
        &self.registry
    }

    /// Build the router. `config.path` must start with '/'.
    pub fn router(&self) -> Router {
        let state = AppState {
            registry: self.registry.clone(),
        };

        let router = Router::new()
            .route(&self.config.path, post(rpc_handler))
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(TimeoutLayer::new(self.config.request_timeout()))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        if self.config.allow_cors {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Bind the listener. A bind failure is returned, never retried.
    pub async fn bind(self) -> Result<BoundServer> {
        self.config.validate()?;
        let addr = self.config.socket_addr()?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| DatePredictionError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Starting server on port {}...", local_addr.port());

        Ok(BoundServer {
            listener,
            router: self.router(),
            local_addr,
        })
    }
}

/// A server whose listener is bound and ready to accept
#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl BoundServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until the process exits
    pub async fn serve(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Serve until `signal` resolves, then drain in-flight requests
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("Server on {} stopped", self.local_addr);
        Ok(())
    }
}

/// POST handler: one body in, one envelope out
async fn rpc_handler(State(state): State<AppState>, body: Bytes) -> Response {
    match state.registry.handle(&body) {
        Ok(envelope) => Json(envelope).into_response(),
        Err(e) if e.is_decode_error() => {
            (StatusCode::BAD_REQUEST, INVALID_JSON_BODY).into_response()
        }
        Err(e) => {
            tracing::error!("RPC handling failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

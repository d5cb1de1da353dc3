//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the outbound client shared by every request
//! - Create the Axum router: every path and method reaches the handler
//! - Wire up request tracing
//! - Serve the listener until the process is terminated

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::error::Error;
use crate::http::handler::relay_handler;
use crate::http::upstream::Upstream;
use crate::observability::spans::make_request_span;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    /// Outbound client. Its connection pool is the only thing shared
    /// between requests.
    pub upstream: Upstream,
}

/// The relay server. Owns the router; the listener is handed to `serve`.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
}

impl RelayServer {
    /// Create a new relay server with default outbound client settings.
    pub fn new(config: RelayConfig) -> Self {
        let router = Self::build_router(AppState {
            upstream: Upstream::new(),
        });
        Self { router, config }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(relay_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
    }

    /// The router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve connections on `listener`. Each connection runs as its own
    /// task. Only returns on a fatal server error.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Error> {
        let addr = listener.local_addr().map_err(Error::Serve)?;
        tracing::info!(
            address = %addr,
            configured = %self.config.listener.bind_address,
            "Relay serving"
        );

        axum::serve(listener, self.router)
            .await
            .map_err(Error::Serve)
    }
}

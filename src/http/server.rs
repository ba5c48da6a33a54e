//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the static pages and the relay fallback
//! - Wire up request tracing
//! - Build the shared upstream client once
//! - Dispatch requests to the routing engine
//! - Forward resolved requests upstream

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::http::forward::{without_query, Forwarder};
use crate::http::{request, response};
use crate::lifecycle::wait_for_shutdown;
use crate::routing::Router as ProxyRouter;
use crate::security::HeaderFilter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub forwarder: Forwarder,
}

/// HTTP server for the relay.
pub struct RelayServer {
    app: Router,
}

impl RelayServer {
    /// Create a new server from a validated configuration.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let router = Arc::new(ProxyRouter::from_config(&config.routes, &config.exact_routes));
        let filter = HeaderFilter::from_config(&config.headers);
        let mut client = reqwest::Client::builder();
        if !config.upstream.use_system_proxy {
            client = client.no_proxy();
        }
        let client = client.build()?;

        tracing::info!(
            prefix_routes = router.len(),
            exact_routes = config.exact_routes.0.len(),
            "Route table compiled"
        );

        let state = AppState {
            router,
            forwarder: Forwarder::new(client, filter),
        };

        Ok(Self {
            app: Self::build_router(state),
        })
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(response::index))
            .route("/index.html", any(response::index))
            .route("/robots.txt", any(response::robots))
            .fallback(relay_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(request::request_span))
    }

    /// The assembled Axum application.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Serve on `listener` until Ctrl+C/SIGTERM or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolves the upstream for the request path and relays the exchange.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let Some(target) = state
        .router
        .resolve(request.uri().path(), request.uri().query())
    else {
        tracing::debug!("No route matched");
        return response::not_found();
    };

    let upstream = without_query(&target).to_string();
    tracing::debug!(upstream = %upstream, "Forwarding request");

    match state.forwarder.forward(request, &target).await {
        Ok(response) => {
            tracing::debug!(upstream = %upstream, status = %response.status(), "Upstream responded");
            response
        }
        Err(e) => {
            tracing::error!(upstream = %upstream, error = ?e, "Proxy request failed");
            e.into_response()
        }
    }
}

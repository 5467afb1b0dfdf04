//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all handler
//! - Wire up middleware (tracing)
//! - Bind server to listener
//! - Admit requests through the gatekeeper
//! - Forward admitted requests to the upstream
//! - Drain in-flight requests on shutdown within the grace period

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::forward::Forwarder;
use crate::http::response;
use crate::lifecycle::shutdown::drain_with_grace;
use crate::net::{TlsError, TrustPolicy};
use crate::observability::metrics::{self, Outcome};
use crate::routing::Gatekeeper;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gatekeeper: Arc<Gatekeeper>,
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the sidecar.
pub struct HttpServer {
    router: Router,
    shutdown_grace: Duration,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and trust policy.
    pub fn new(config: &ProxyConfig, trust: &TrustPolicy) -> Result<Self, TlsError> {
        let tls = Arc::new(trust.client_config()?);

        let gatekeeper = Gatekeeper::new(
            config.allowed_paths.clone(),
            config.allowed_methods.clone(),
        );
        if gatekeeper.denies_everything() {
            tracing::warn!("Path or method allow-list is empty, every request will be rejected");
        }

        let state = AppState {
            gatekeeper: Arc::new(gatekeeper),
            forwarder: Arc::new(Forwarder::new(
                &config.upstream_endpoint,
                tls,
                config.request_timeout,
            )),
        };

        Ok(Self {
            router: Self::build_router(state),
            shutdown_grace: config.shutdown_grace,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires and in-flight requests drain.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut graceful = shutdown.resubscribe();
        let serve = axum::serve(listener, self.router).with_graceful_shutdown(async move {
            let _ = graceful.recv().await;
            tracing::info!("Shutting down server, draining in-flight requests");
        });

        match drain_with_grace(serve.into_future(), shutdown, self.shutdown_grace).await {
            Some(result) => result?,
            None => tracing::warn!(
                grace_secs = self.shutdown_grace.as_secs_f64(),
                "Grace period elapsed with requests still in flight"
            ),
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Checks the allow-lists, then forwards the request upstream.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if state.gatekeeper.admit(&request).is_err() {
        metrics::record_request(method.as_str(), 404, Outcome::Denied, start_time);
        return response::not_found();
    }

    tracing::debug!(method = %method, path = %path, "Forwarding request");

    match state.forwarder.forward(request).await {
        Ok(response) => {
            metrics::record_request(
                method.as_str(),
                response.status().as_u16(),
                Outcome::Forwarded,
                start_time,
            );
            response
        }
        Err(e) => {
            let status = e.status();
            tracing::error!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                error = %e.detail(),
                "Error while requesting from upstream"
            );
            metrics::record_request(method.as_str(), status.as_u16(), Outcome::Failed, start_time);
            e.into_response()
        }
    }
}

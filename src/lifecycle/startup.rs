//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Resolve upstream trust material
//! - Install metrics exporter and signal handlers
//! - Bind the listener and serve until shutdown completes
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use crate::config::{self, ConfigError, ProxyConfig};
use crate::http::HttpServer;
use crate::lifecycle::{Shutdown, TerminationSignals};
use crate::net::{self, ListenerError, TlsError, TrustPolicy};
use crate::observability::metrics::{self, MetricsError};

/// Error type for anything that stops the process from serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("trust configuration error: {0}")]
    Tls(#[from] TlsError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] std::io::Error),
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Load configuration from the environment and serve.
pub async fn run_from_env() -> Result<(), StartupError> {
    let config = config::load_from_env()?;
    run(config).await
}

/// Serve with the given configuration until a termination signal drains it.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    tracing::info!(
        listen_addr = %config.listen_addr,
        upstream = %config.upstream_endpoint,
        allowed_paths = config.allowed_paths.len(),
        allowed_methods = config.allowed_methods.len(),
        request_timeout_ms = config.request_timeout.as_millis() as u64,
        "Configuration loaded"
    );

    let trust = TrustPolicy::resolve(config.ca_cert_path.as_deref())?;
    let server = HttpServer::new(&config, &trust)?;

    if let Some(addr) = &config.metrics_addr {
        metrics::init_metrics(addr)?;
    }

    let mut signals = TerminationSignals::install().map_err(StartupError::Signals)?;
    let listener = net::bind(&config.listen_addr).await?;

    let shutdown = Shutdown::new();
    let serve = server.run(listener, shutdown.subscribe());
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => return result.map_err(StartupError::Serve),
        signal = signals.recv() => {
            tracing::info!(signal, "Termination signal received");
            shutdown.trigger();
        }
    }

    serve.await.map_err(StartupError::Serve)
}

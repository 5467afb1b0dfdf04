//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sidecar_requests_total` (counter): requests by method, status, outcome
//! - `sidecar_request_duration_seconds` (histogram): latency by method, outcome
//!
//! Denied requests carry the caller's raw method, so they are recorded under
//! the fixed method label `other` to keep the series count bounded.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Method label used for requests outside the allow-list.
pub const OTHER_METHOD: &str = "other";

/// How a request left the sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Rejected by the allow-lists.
    Denied,
    /// Upstream response relayed.
    Forwarded,
    /// Upstream exchange failed before a response arrived.
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Denied => "denied",
            Outcome::Forwarded => "forwarded",
            Outcome::Failed => "failed",
        }
    }
}

/// Error type for exporter installation.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("invalid metrics address {addr:?}: {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to install metrics exporter: {0}")]
    Install(#[from] BuildError),
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: &str) -> Result<(), MetricsError> {
    let socket: SocketAddr = addr.parse().map_err(|source| MetricsError::Address {
        addr: addr.to_string(),
        source,
    })?;

    PrometheusBuilder::new().with_http_listener(socket).install()?;

    tracing::info!(address = %socket, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request.
///
/// `method` is only used as a label for admitted requests.
pub fn record_request(method: &str, status: u16, outcome: Outcome, start_time: Instant) {
    let method = match outcome {
        Outcome::Denied => OTHER_METHOD,
        Outcome::Forwarded | Outcome::Failed => method,
    };

    metrics::counter!(
        "sidecar_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    metrics::histogram!(
        "sidecar_request_duration_seconds",
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .record(start_time.elapsed().as_secs_f64());
}

//! Configuration schema definitions.
//!
//! Every setting maps to one environment variable; the constants below are
//! the variable names and the defaults used when a variable is unset or empty.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

pub const LISTEN_ADDR: &str = "LISTEN_ADDR";
pub const UPSTREAM_ENDPOINT: &str = "UPSTREAM_ENDPOINT";
pub const UPSTREAM_ALLOW_PATHS: &str = "UPSTREAM_ALLOW_PATHS";
pub const ALLOWED_METHODS: &str = "ALLOWED_METHODS";
pub const CA_CERT_PATH: &str = "CA_CERT_PATH";
pub const REQUEST_TIMEOUT_DURATION: &str = "REQUEST_TIMEOUT_DURATION";
pub const METRICS_ADDR: &str = "METRICS_ADDR";

pub const DEFAULT_LISTEN_ADDR: &str = ":8082";
pub const DEFAULT_UPSTREAM_ENDPOINT: &str = "https://127.0.0.1:8281";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "1s";

/// Grace period granted to in-flight requests once shutdown starts.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Root configuration for the sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Listen address, either `host:port` or Go-style `:port`.
    pub listen_addr: String,

    /// Upstream base URL without a trailing slash.
    pub upstream_endpoint: String,

    /// Paths forwarded upstream (exact match).
    pub allowed_paths: HashSet<String>,

    /// Methods forwarded upstream (exact, case-sensitive match).
    pub allowed_methods: HashSet<String>,

    /// PEM bundle used to verify the upstream. `None` disables verification.
    pub ca_cert_path: Option<PathBuf>,

    /// Deadline for the whole upstream exchange, body included.
    pub request_timeout: Duration,

    /// Drain window after a termination signal.
    pub shutdown_grace: Duration,

    /// Optional Prometheus scrape address.
    pub metrics_addr: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            upstream_endpoint: DEFAULT_UPSTREAM_ENDPOINT.to_string(),
            allowed_paths: HashSet::new(),
            allowed_methods: HashSet::new(),
            ca_cert_path: None,
            request_timeout: Duration::from_secs(1),
            shutdown_grace: SHUTDOWN_GRACE,
            metrics_addr: None,
        }
    }
}

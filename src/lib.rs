//! TLS forwarding sidecar library.
//!
//! Terminates plaintext HTTP, admits only allow-listed path/method pairs and
//! re-issues them to a single upstream over TLS, streaming the response back.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use net::TrustPolicy;

//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at process start
//! - Honour `RUST_LOG` directives, falling back to a sensible default

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "tls_sidecar=info,tower_http=info";

/// Install the global subscriber.
pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

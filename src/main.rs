//! TLS Forwarding Sidecar
//!
//! Sits in front of a service that requires TLS and exposes a restricted,
//! allow-listed subset of its endpoints over plain HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                    SIDECAR                       │
//!   Client Request       │  ┌──────────┐    ┌────────────┐    ┌───────────┐ │
//!   ─────────────────────┼─▶│ listener │───▶│ gatekeeper │───▶│ forwarder │─┼──▶ Upstream
//!   (plain HTTP)         │  └──────────┘    └─────┬──────┘    └─────┬─────┘ │    (TLS)
//!                        │                        │ 404             │       │
//!   Client Response      │                        ▼                 ▼       │
//!   ◀────────────────────┼────────────────── response ◀──── streamed relay ◀┼─── Upstream
//!                        │                                                  │
//!                        │  config (env) · trust (CA bundle) · lifecycle    │
//!                        └──────────────────────────────────────────────────┘
//! ```
//!
//! Configuration comes only from environment variables; see [`tls_sidecar::config`].

use tls_sidecar::lifecycle::startup;
use tls_sidecar::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!("tls-sidecar v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = startup::run_from_env().await {
        tracing::error!(error = %e, "Fatal error");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

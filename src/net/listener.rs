//! TCP listener binding.
//!
//! # Responsibilities
//! - Translate the configured listen address into a bindable one
//! - Bind the inbound TCP listener
//! - Report bind failures with the address that failed

use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Expand a bare `:port` into an all-interfaces address.
pub fn normalize_listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}

/// Bind the inbound listener on the configured address.
pub async fn bind(listen_addr: &str) -> Result<TcpListener, ListenerError> {
    let addr = normalize_listen_addr(listen_addr);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ListenerError::Bind { addr: addr.clone(), source })?;

    if let Ok(local_addr) = listener.local_addr() {
        tracing::info!(address = %local_addr, "Listener bound");
    }

    Ok(listener)
}

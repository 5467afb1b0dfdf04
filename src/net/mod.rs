//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound (plaintext):
//!     LISTEN_ADDR → listener.rs (normalize, bind) → HTTP layer
//!
//! Outbound (TLS):
//!     CA_CERT_PATH → tls.rs (TrustPolicy, once at startup)
//!     → rustls ClientConfig shared by every per-request client
//! ```
//!
//! # Design Decisions
//! - Trust material is loaded once; a broken bundle stops startup
//! - Without a bundle, upstream certificates are accepted unverified

pub mod listener;
pub mod tls;

pub use listener::{bind, normalize_listen_addr, ListenerError};
pub use tls::{TlsError, TrustPolicy};

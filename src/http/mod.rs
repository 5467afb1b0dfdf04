//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (plaintext)
//!     → server.rs (Axum setup, fallback handler)
//!     → routing::Gatekeeper (allow-lists; 404 on denial)
//!     → forward.rs (build target, one TLS exchange upstream)
//!     → body.rs (deadline-bounded streaming relay)
//!     → response.rs (framing headers stripped, error bodies)
//!     → Send to client
//! ```

pub mod body;
pub mod forward;
pub mod response;
pub mod server;

pub use forward::{ForwardError, Forwarder};
pub use server::{AppState, HttpServer};

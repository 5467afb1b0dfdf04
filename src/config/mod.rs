//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read variables, apply defaults, split allow-lists)
//!     → duration.rs (parse REQUEST_TIMEOUT_DURATION)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared by reference with the server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - Empty variables behave exactly like unset ones
//! - Any loading or validation error is fatal before the listener binds

pub mod duration;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, load_with, ConfigError};
pub use schema::ProxyConfig;

//! Request admission subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request
//!     → gatekeeper.rs (path allow-list, then method allow-list)
//!     → Admitted: hand to forwarder
//!     → Denied: 404, upstream never contacted
//! ```
//!
//! # Design Decisions
//! - Exact string matching only: no prefixes, wildcards or normalization
//! - Empty allow-list admits nothing
//! - Which list rejected the request is logged, never returned to the caller

pub mod gatekeeper;
pub mod matcher;

pub use gatekeeper::{Denial, Gatekeeper};
pub use matcher::{Matcher, MethodMatcher, PathMatcher};

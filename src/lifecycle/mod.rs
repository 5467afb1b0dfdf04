//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve trust → Build server → Install signals → Bind → Serve
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Stop accepting → Drain in-flight requests (bounded grace) → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)
//! - Shutdown has a deadline: the process exits once the grace period elapses

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{drain_with_grace, Shutdown};
pub use signals::TerminationSignals;
pub use startup::StartupError;

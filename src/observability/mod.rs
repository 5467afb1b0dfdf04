//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG)
//!     → Metrics endpoint (Prometheus scrape, when METRICS_ADDR is set)
//! ```
//!
//! # Design Decisions
//! - Detail about failures goes to logs, never to callers
//! - Metrics are cheap (no-op recorder when no exporter is installed)

pub mod logging;
pub mod metrics;

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; request ID flows through all subsystems
//! - Metrics are cheap (atomic increments) and labeled by routing decision
//! - The metrics exporter runs on its own bind address

pub mod logging;
pub mod metrics;

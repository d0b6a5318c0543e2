//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Initialize subsystems → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Trigger config reload
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then listener
//! - Fail fast: any startup error is fatal
//! - Shutdown has a drain timeout on the TLS path

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;

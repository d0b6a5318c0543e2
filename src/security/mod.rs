//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-IP limits)
//!     → limits.rs (request body size cap)
//!     → pass to routing
//!
//! Outgoing response:
//!     → headers.rs (standard security response headers)
//! ```
//!
//! # Design Decisions
//! - All checks read live config so hot reload applies without restart
//! - Rate limiting fails closed (429); header injection never overwrites
//!   upstream-set values

pub mod headers;
pub mod limits;
pub mod rate_limit;

pub use rate_limit::RateLimiterState;

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, headers, session)
//!     → host.rs (tenant vs primary classification)
//!     → locale.rs (locale resolution: path prefix, Accept-Language, default)
//!     → rules.rs (ordered rule pipeline over an immutable context)
//!     → decision.rs (Pass / Forward / Redirect / Rewrite)
//!
//! Pipeline Compilation (at startup):
//!     GatewayConfig
//!     → Compile rules in their fixed, documented order
//!     → Freeze as immutable RulePipeline
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Every rule is a pure predicate-plus-action over the request context
//! - Deterministic: same context always yields the same decision
//! - First match wins; at most one redirect or rewrite per request

pub mod decision;
pub mod host;
pub mod locale;
pub mod rules;

pub use decision::{Decision, RouteAction};
pub use host::HostClass;
pub use locale::LocaleSet;
pub use rules::{RequestContext, RoutingRule, RulePipeline};

//! Routing decisions as plain data.
//!
//! # Design Decisions
//! - Decisions are values, not side effects: the pipeline returns what should
//!   happen and the HTTP layer applies it
//! - Explicit pass-through rather than silent default
//! - Serializable so the admin `decide` endpoint can dry-run the pipeline

use serde::Serialize;

/// Response headers attached to tenant traffic.
pub const X_SUBDOMAIN: &str = "x-subdomain";

/// Caching directive for tenant storefront responses.
pub const TENANT_CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";

/// Redirect status used for locale and auth redirects: method-preserving and
/// never cacheable as permanent.
pub const REDIRECT_STATUS: u16 = 307;

/// What the gateway should do with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteAction {
    /// Forward completely untouched (asset/API bypass).
    Pass,

    /// Forward to the upstream renderer; tenant traffic carries the
    /// `x-subdomain` and caching headers.
    Forward { tenant: Option<String> },

    /// Client-visible redirect.
    Redirect { location: String, status: u16 },

    /// Server-side rewrite, invisible to the client.
    Rewrite { path: String, tenant: String },
}

impl RouteAction {
    /// Tenant label carried by this action, if any.
    pub fn tenant(&self) -> Option<&str> {
        match self {
            RouteAction::Forward { tenant } => tenant.as_deref(),
            RouteAction::Rewrite { tenant, .. } => Some(tenant),
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteAction::Pass => "pass",
            RouteAction::Forward { .. } => "forward",
            RouteAction::Redirect { .. } => "redirect",
            RouteAction::Rewrite { .. } => "rewrite",
        }
    }
}

/// A routing decision: the action plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Name of the rule that matched.
    pub rule: &'static str,
    pub action: RouteAction,
}

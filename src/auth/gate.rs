//! Route-protection policy.
//!
//! Pure function of (locale-stripped path, session state, resolved locale):
//! no request, no response, no backend. The HTTP layer supplies the inputs
//! and applies whatever action comes back.

use crate::auth::session::SessionState;
use crate::config::schema::AuthConfig;
use crate::routing::decision::{RouteAction, REDIRECT_STATUS};

/// The compiled protection policy: which prefixes require a session, which
/// are only reachable signed out, and where each case redirects.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    auth_only_prefixes: Vec<String>,
    protected_prefixes: Vec<String>,
    login_path: String,
    dashboard_path: String,
}

impl GatePolicy {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            auth_only_prefixes: config.auth_only_prefixes.clone(),
            protected_prefixes: config.protected_prefixes.clone(),
            login_path: config.login_path.clone(),
            dashboard_path: config.dashboard_path.clone(),
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "protect {}; redirect signed-in users away from {}",
            self.protected_prefixes.join(", "),
            self.auth_only_prefixes.join(", ")
        )
    }

    /// Decide whether the request must be redirected.
    ///
    /// `route_path` is the locale-stripped path; `original_path` is the path
    /// exactly as requested, preserved as the post-login return target.
    pub fn evaluate(
        &self,
        route_path: &str,
        session: &SessionState,
        locale: &str,
        original_path: &str,
    ) -> Option<RouteAction> {
        let authenticated = session.is_authenticated();

        if !authenticated && self.matches(&self.protected_prefixes, route_path) {
            let target: String =
                url::form_urlencoded::byte_serialize(original_path.as_bytes()).collect();
            return Some(RouteAction::Redirect {
                location: format!("/{}{}?redirect={}", locale, self.login_path, target),
                status: REDIRECT_STATUS,
            });
        }

        if authenticated && self.matches(&self.auth_only_prefixes, route_path) {
            return Some(RouteAction::Redirect {
                location: format!("/{}{}", locale, self.dashboard_path),
                status: REDIRECT_STATUS,
            });
        }

        None
    }

    /// Segment-aware prefix match: "/dashboard" covers "/dashboard" and
    /// "/dashboard/settings" but not "/dashboards".
    fn matches(&self, prefixes: &[String], path: &str) -> bool {
        prefixes.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

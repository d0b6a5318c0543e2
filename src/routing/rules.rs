//! The routing rule pipeline.
//!
//! # Responsibilities
//! - Build the immutable request context (host class, locale, session state)
//! - Evaluate the named rules in their fixed, documented order
//! - Return the first matching action, or the pass-through default
//!
//! # Rule Order
//! ```text
//! 1. bypass          — asset/API prefixes and dotted paths, untouched
//! 2. tenant-rewrite  — subdomain traffic: root → /product/{tenant}
//! 3. auth-gate       — primary traffic, locale-stripped path vs route policy
//! 4. locale-redirect — primary traffic lacking a locale prefix
//! 5. pass-through    — everything else
//! ```
//!
//! The gate is evaluated before the locale redirect on the already-resolved
//! locale, so an unauthenticated hit on a protected path costs exactly one
//! redirect. Locale resolution itself is total and happens during context
//! construction.

use crate::auth::gate::GatePolicy;
use crate::auth::session::SessionState;
use crate::config::schema::GatewayConfig;
use crate::routing::decision::{Decision, RouteAction, REDIRECT_STATUS};
use crate::routing::host::HostClass;
use crate::routing::locale::{LocaleSet, ResolvedLocale};

/// Everything a rule may consult, assembled once per request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub host: HostClass,
    /// Path exactly as received.
    pub path: String,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    pub locale: ResolvedLocale,
    /// Path with any locale prefix stripped; route policy matches on this.
    pub route_path: String,
    pub session: SessionState,
}

impl RequestContext {
    pub fn new(
        host: HostClass,
        path: &str,
        query: Option<&str>,
        accept_language: Option<&str>,
        locales: &LocaleSet,
        session: SessionState,
    ) -> Self {
        let locale = locales.resolve(path, accept_language);
        let route_path = match locales.split_prefix(path) {
            Some((_tag, rest)) => rest.to_string(),
            None => path.to_string(),
        };

        Self {
            host,
            path: path.to_string(),
            query: query.map(str::to_string),
            locale,
            route_path,
            session,
        }
    }

    fn query_suffix(&self) -> String {
        match &self.query {
            Some(q) => format!("?{}", q),
            None => String::new(),
        }
    }
}

/// A named routing rule: pure predicate plus action.
pub trait RoutingRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// One-line summary for the admin surface.
    fn describe(&self) -> String;

    fn evaluate(&self, ctx: &RequestContext) -> Option<RouteAction>;
}

/// True when the path must skip all routing logic.
///
/// Asset and API traffic is never redirected, rewritten, or decorated; a
/// dotted path is treated as a static file.
pub fn is_bypass(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| path.starts_with(p.as_str())) || path.contains('.')
}

/// Rule 1: asset/API bypass.
struct BypassRule {
    prefixes: Vec<String>,
}

impl RoutingRule for BypassRule {
    fn name(&self) -> &'static str {
        "bypass"
    }

    fn describe(&self) -> String {
        format!("pass {} and dotted paths untouched", self.prefixes.join(", "))
    }

    fn evaluate(&self, ctx: &RequestContext) -> Option<RouteAction> {
        is_bypass(&ctx.path, &self.prefixes).then_some(RouteAction::Pass)
    }
}

/// Rule 2: tenant subdomain handling.
struct TenantRewriteRule {
    tenant_path_prefix: String,
}

impl RoutingRule for TenantRewriteRule {
    fn name(&self) -> &'static str {
        "tenant-rewrite"
    }

    fn describe(&self) -> String {
        format!(
            "rewrite tenant roots to {}/{{tenant}}",
            self.tenant_path_prefix
        )
    }

    fn evaluate(&self, ctx: &RequestContext) -> Option<RouteAction> {
        let label = ctx.host.tenant()?;

        if ctx.path == "/" {
            Some(RouteAction::Rewrite {
                path: format!("{}/{}", self.tenant_path_prefix, label),
                tenant: label.to_string(),
            })
        } else {
            Some(RouteAction::Forward {
                tenant: Some(label.to_string()),
            })
        }
    }
}

/// Rule 3: authentication gate (primary traffic only).
struct AuthGateRule {
    policy: GatePolicy,
}

impl RoutingRule for AuthGateRule {
    fn name(&self) -> &'static str {
        "auth-gate"
    }

    fn describe(&self) -> String {
        self.policy.describe()
    }

    fn evaluate(&self, ctx: &RequestContext) -> Option<RouteAction> {
        if ctx.host != HostClass::Primary {
            return None;
        }

        self.policy
            .evaluate(&ctx.route_path, &ctx.session, &ctx.locale.tag, &ctx.path)
    }
}

/// Rule 4: locale redirect (primary traffic only).
struct LocaleRedirectRule;

impl RoutingRule for LocaleRedirectRule {
    fn name(&self) -> &'static str {
        "locale-redirect"
    }

    fn describe(&self) -> String {
        "redirect primary traffic to its locale-prefixed path".to_string()
    }

    fn evaluate(&self, ctx: &RequestContext) -> Option<RouteAction> {
        if ctx.host != HostClass::Primary || ctx.locale.from_path {
            return None;
        }

        let location = if ctx.path == "/" {
            format!("/{}{}", ctx.locale.tag, ctx.query_suffix())
        } else {
            format!("/{}{}{}", ctx.locale.tag, ctx.path, ctx.query_suffix())
        };

        Some(RouteAction::Redirect {
            location,
            status: REDIRECT_STATUS,
        })
    }
}

/// The compiled, ordered rule set.
pub struct RulePipeline {
    rules: Vec<Box<dyn RoutingRule>>,
}

impl RulePipeline {
    /// Compile the pipeline from config. The order here is the priority
    /// contract; it never changes at runtime.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let rules: Vec<Box<dyn RoutingRule>> = vec![
            Box::new(BypassRule {
                prefixes: config.routing.bypass_prefixes.clone(),
            }),
            Box::new(TenantRewriteRule {
                tenant_path_prefix: config.routing.tenant_path_prefix.clone(),
            }),
            Box::new(AuthGateRule {
                policy: GatePolicy::from_config(&config.auth),
            }),
            Box::new(LocaleRedirectRule),
        ];

        Self { rules }
    }

    /// Evaluate the rules in order; first match wins.
    pub fn decide(&self, ctx: &RequestContext) -> Decision {
        for rule in &self.rules {
            if let Some(action) = rule.evaluate(ctx) {
                return Decision {
                    rule: rule.name(),
                    action,
                };
            }
        }

        Decision {
            rule: "pass-through",
            action: RouteAction::Forward { tenant: None },
        }
    }

    /// The rules in evaluation order, for the admin surface.
    pub fn rules(&self) -> impl Iterator<Item = &dyn RoutingRule> {
        self.rules.iter().map(|r| r.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::host;

    fn pipeline(base_domain: &str) -> (RulePipeline, LocaleSet, GatewayConfig) {
        let mut config = GatewayConfig::default();
        config.routing.base_domain = base_domain.to_string();
        let locales = LocaleSet::new(
            config.locales.supported.clone(),
            config.locales.default.clone(),
        );
        (RulePipeline::from_config(&config), locales, config)
    }

    fn decide(
        base_domain: &str,
        host: Option<&str>,
        path: &str,
        accept_language: Option<&str>,
        session: SessionState,
    ) -> Decision {
        let (pipeline, locales, config) = pipeline(base_domain);
        let class = host::classify(host, base_domain, &config.routing.reserved_labels);
        let ctx = RequestContext::new(class, path, None, accept_language, &locales, session);
        pipeline.decide(&ctx)
    }

    #[test]
    fn test_asset_and_api_paths_pass_untouched() {
        for path in ["/_static/app.js", "/api/products", "/favicon.ico"] {
            let decision = decide(
                "example.com",
                Some("example.com"),
                path,
                None,
                SessionState::Anonymous,
            );
            assert_eq!(decision.rule, "bypass", "path {}", path);
            assert_eq!(decision.action, RouteAction::Pass);
        }
    }

    #[test]
    fn test_bypass_wins_over_tenant_rewrite() {
        let decision = decide(
            "example.com",
            Some("acme.example.com"),
            "/api/orders",
            None,
            SessionState::Anonymous,
        );
        assert_eq!(decision.action, RouteAction::Pass);
    }

    #[test]
    fn test_tenant_root_rewrites_to_product_path() {
        let decision = decide(
            "example.com",
            Some("acme.example.com"),
            "/",
            None,
            SessionState::Anonymous,
        );
        assert_eq!(decision.rule, "tenant-rewrite");
        assert_eq!(
            decision.action,
            RouteAction::Rewrite {
                path: "/product/acme".to_string(),
                tenant: "acme".to_string(),
            }
        );
    }

    #[test]
    fn test_tenant_deep_path_forwards_with_tenant() {
        let decision = decide(
            "example.com",
            Some("acme.example.com"),
            "/checkout",
            None,
            SessionState::Anonymous,
        );
        assert_eq!(
            decision.action,
            RouteAction::Forward {
                tenant: Some("acme".to_string()),
            }
        );
    }

    #[test]
    fn test_reserved_subdomain_gets_locale_logic() {
        let decision = decide(
            "example.com",
            Some("www.example.com"),
            "/",
            None,
            SessionState::Anonymous,
        );
        assert_eq!(decision.rule, "locale-redirect");
        assert_eq!(
            decision.action,
            RouteAction::Redirect {
                location: "/en".to_string(),
                status: 307,
            }
        );
    }

    #[test]
    fn test_locale_redirect_is_idempotent() {
        let first = decide(
            "example.com",
            Some("example.com"),
            "/pricing",
            None,
            SessionState::Anonymous,
        );
        let RouteAction::Redirect { location, .. } = &first.action else {
            panic!("expected redirect, got {:?}", first.action);
        };
        assert_eq!(location, "/en/pricing");

        // Applying the router to the redirected path is a no-op.
        let second = decide(
            "example.com",
            Some("example.com"),
            location,
            None,
            SessionState::Anonymous,
        );
        assert_eq!(second.rule, "pass-through");
    }

    #[test]
    fn test_locale_redirect_negotiates_accept_language() {
        let decision = decide(
            "example.com",
            Some("example.com"),
            "/pricing",
            Some("fr-FR,fr;q=0.9,en;q=0.5"),
            SessionState::Anonymous,
        );
        assert_eq!(
            decision.action,
            RouteAction::Redirect {
                location: "/fr/pricing".to_string(),
                status: 307,
            }
        );
    }

    #[test]
    fn test_protected_path_redirects_to_login_with_return_target() {
        // Host outside the base domain is primary traffic.
        let decision = decide(
            "storefront.test",
            Some("app.example.com"),
            "/dashboard",
            None,
            SessionState::Anonymous,
        );
        assert_eq!(decision.rule, "auth-gate");
        assert_eq!(
            decision.action,
            RouteAction::Redirect {
                location: "/en/login?redirect=%2Fdashboard".to_string(),
                status: 307,
            }
        );
    }

    #[test]
    fn test_protected_path_with_locale_keeps_original_return_target() {
        let decision = decide(
            "example.com",
            Some("example.com"),
            "/fr/dashboard/settings",
            None,
            SessionState::Anonymous,
        );
        assert_eq!(
            decision.action,
            RouteAction::Redirect {
                location: "/fr/login?redirect=%2Ffr%2Fdashboard%2Fsettings".to_string(),
                status: 307,
            }
        );
    }

    #[test]
    fn test_authenticated_user_leaves_login_for_dashboard() {
        let decision = decide(
            "example.com",
            Some("example.com"),
            "/en/login",
            None,
            SessionState::Authenticated {
                user_id: "user-1".to_string(),
            },
        );
        assert_eq!(decision.rule, "auth-gate");
        assert_eq!(
            decision.action,
            RouteAction::Redirect {
                location: "/en/dashboard".to_string(),
                status: 307,
            }
        );
    }

    #[test]
    fn test_authenticated_user_passes_protected_path() {
        let decision = decide(
            "example.com",
            Some("example.com"),
            "/en/dashboard",
            None,
            SessionState::Authenticated {
                user_id: "user-1".to_string(),
            },
        );
        assert_eq!(decision.rule, "pass-through");
    }

    #[test]
    fn test_locale_redirect_preserves_query() {
        let (pipeline, locales, config) = pipeline("example.com");
        let class = host::classify(
            Some("example.com"),
            &config.routing.base_domain,
            &config.routing.reserved_labels,
        );
        let ctx = RequestContext::new(
            class,
            "/pricing",
            Some("plan=pro"),
            None,
            &locales,
            SessionState::Anonymous,
        );
        assert_eq!(
            pipeline.decide(&ctx).action,
            RouteAction::Redirect {
                location: "/en/pricing?plan=pro".to_string(),
                status: 307,
            }
        );
    }

    #[test]
    fn test_rule_order_is_the_documented_contract() {
        let (pipeline, _, _) = pipeline("example.com");
        let names: Vec<&str> = pipeline.rules().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec!["bypass", "tenant-rewrite", "auth-gate", "locale-redirect"]
        );
    }
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Request classification: base domain, reserved labels, bypass prefixes.
    pub routing: RoutingConfig,

    /// Supported UI locales and the default.
    pub locales: LocaleConfig,

    /// Auth backend and route-protection policy.
    pub auth: AuthConfig,

    /// Rendering backend the gateway forwards to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Request classification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Platform base domain; hosts ending in it are candidate tenant traffic.
    pub base_domain: String,

    /// Subdomain labels that are never tenants (e.g., "www").
    pub reserved_labels: Vec<String>,

    /// Path prefixes that skip all routing logic (assets, API).
    pub bypass_prefixes: Vec<String>,

    /// Canonical per-tenant route; root requests rewrite to
    /// `{tenant_path_prefix}/{tenant}`.
    pub tenant_path_prefix: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_domain: "example.com".to_string(),
            reserved_labels: vec!["www".to_string()],
            bypass_prefixes: vec!["/_static".to_string(), "/api".to_string()],
            tenant_path_prefix: "/product".to_string(),
        }
    }
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Supported locale tags, matched against path prefixes and
    /// `Accept-Language`.
    pub supported: Vec<String>,

    /// Fallback when neither the path nor the headers resolve a locale.
    pub default: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            supported: vec!["en".to_string(), "fr".to_string()],
            default: "en".to_string(),
        }
    }
}

/// Auth backend and route-protection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Base URL of the external auth service (e.g., "http://127.0.0.1:9999").
    pub endpoint: String,

    /// Cookie carrying the access token.
    pub access_cookie: String,

    /// Cookie carrying the refresh token.
    pub refresh_cookie: String,

    /// Session refresh timeout in seconds.
    pub timeout_secs: u64,

    /// Route prefixes only reachable while signed out (locale-stripped).
    pub auth_only_prefixes: Vec<String>,

    /// Route prefixes requiring a signed-in user (locale-stripped).
    pub protected_prefixes: Vec<String>,

    /// Login route, locale-prefixed at redirect time.
    pub login_path: String,

    /// Dashboard route, locale-prefixed at redirect time.
    pub dashboard_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9999".to_string(),
            access_cookie: "access_token".to_string(),
            refresh_cookie: "refresh_token".to_string(),
            timeout_secs: 3,
            auth_only_prefixes: vec![
                "/login".to_string(),
                "/signup".to_string(),
                "/reset-password".to_string(),
            ],
            protected_prefixes: vec!["/dashboard".to_string()],
            login_path: "/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
        }
    }
}

/// Upstream rendering backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Backend address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Idle connection timeout in seconds.
    pub idle_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            idle_secs: 60,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum requests per second per IP.
    pub requests_per_second: u32,

    /// Burst capacity.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            requests_per_second: 100,
            burst_size: 50,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin endpoints.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security response headers.
    pub enable_headers: bool,

    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

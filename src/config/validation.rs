//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default locale is a supported locale)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic configuration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("routing.base_domain must not be empty")]
    EmptyBaseDomain,

    #[error("routing.base_domain {0:?} must not carry a scheme or path")]
    BaseDomainNotBare(String),

    #[error("routing.bypass_prefixes entry {0:?} must start with '/'")]
    BypassPrefixNotAbsolute(String),

    #[error("routing.tenant_path_prefix {0:?} must start with '/'")]
    TenantPrefixNotAbsolute(String),

    #[error("locales.supported must not be empty")]
    NoLocales,

    #[error("locales.default {0:?} is not in locales.supported")]
    DefaultLocaleUnsupported(String),

    #[error("auth.endpoint {0:?} is not a valid URL")]
    InvalidAuthEndpoint(String),

    #[error("auth.timeout_secs must be greater than zero")]
    ZeroAuthTimeout,

    #[error("auth route prefix {0:?} must start with '/'")]
    AuthPrefixNotAbsolute(String),

    #[error("upstream.address {0:?} is not a valid socket address")]
    InvalidUpstreamAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("rate_limit.requests_per_second must be greater than zero when enabled")]
    ZeroRateLimit,

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error("admin.api_key must be changed from the placeholder when admin is enabled")]
    PlaceholderAdminKey,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodySize,
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let base = &config.routing.base_domain;
    if base.is_empty() {
        errors.push(ValidationError::EmptyBaseDomain);
    } else if base.contains("://") || base.contains('/') {
        errors.push(ValidationError::BaseDomainNotBare(base.clone()));
    }

    for prefix in &config.routing.bypass_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::BypassPrefixNotAbsolute(prefix.clone()));
        }
    }
    if !config.routing.tenant_path_prefix.starts_with('/') {
        errors.push(ValidationError::TenantPrefixNotAbsolute(
            config.routing.tenant_path_prefix.clone(),
        ));
    }

    if config.locales.supported.is_empty() {
        errors.push(ValidationError::NoLocales);
    } else if !config.locales.supported.contains(&config.locales.default) {
        errors.push(ValidationError::DefaultLocaleUnsupported(
            config.locales.default.clone(),
        ));
    }

    if Url::parse(&config.auth.endpoint).is_err() {
        errors.push(ValidationError::InvalidAuthEndpoint(
            config.auth.endpoint.clone(),
        ));
    }
    if config.auth.timeout_secs == 0 {
        errors.push(ValidationError::ZeroAuthTimeout);
    }
    for prefix in config
        .auth
        .auth_only_prefixes
        .iter()
        .chain(&config.auth.protected_prefixes)
        .chain([&config.auth.login_path, &config.auth.dashboard_path])
    {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::AuthPrefixNotAbsolute(prefix.clone()));
        }
    }

    if config.upstream.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidUpstreamAddress(
            config.upstream.address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.rate_limit.enabled && config.rate_limit.requests_per_second == 0 {
        errors.push(ValidationError::ZeroRateLimit);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.admin.enabled && config.admin.api_key == "CHANGE_ME_IN_PRODUCTION" {
        errors.push(ValidationError::PlaceholderAdminKey);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodySize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

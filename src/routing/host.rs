//! Host header classification.
//!
//! # Responsibilities
//! - Strip the port from the Host header (case-insensitive match per HTTP spec)
//! - Classify hosts as tenant subdomains of the base domain or primary traffic
//! - Exclude reserved labels (e.g., "www") from tenant classification
//!
//! # Design Decisions
//! - Missing or malformed hosts degrade to primary traffic, never an error
//! - Tenant labels are opaque routing keys; no existence check here
//! - Hosts outside the base domain are primary traffic (custom vanity
//!   domains are terminated before this gateway)

/// Classification of the request's Host header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    /// The platform's own marketing/dashboard host (or anything that is not
    /// a tenant subdomain).
    Primary,
    /// A tenant storefront, keyed by its subdomain label.
    Tenant(String),
}

impl HostClass {
    /// Tenant label, if this is tenant traffic.
    pub fn tenant(&self) -> Option<&str> {
        match self {
            HostClass::Tenant(label) => Some(label),
            HostClass::Primary => None,
        }
    }
}

/// Classify a Host header value against the platform base domain.
pub fn classify(host: Option<&str>, base_domain: &str, reserved: &[String]) -> HostClass {
    let Some(host) = host else {
        return HostClass::Primary;
    };

    let host = strip_port(host).to_ascii_lowercase();
    let base = base_domain.to_ascii_lowercase();

    if host == base {
        return HostClass::Primary;
    }

    let Some(prefix) = host.strip_suffix(&base).and_then(|p| p.strip_suffix('.')) else {
        return HostClass::Primary;
    };

    // Multi-level subdomains key on the first label.
    let label = prefix.split('.').next().unwrap_or(prefix);

    if label.is_empty() || reserved.iter().any(|r| r == label) {
        return HostClass::Primary;
    }

    HostClass::Tenant(label.to_string())
}

/// Strip an optional `:port` suffix, leaving IPv6 literals intact.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        match host.split_once(':') {
            Some((name, _port)) => name,
            None => host,
        }
    }
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, rule
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_rate_limited_total` (counter): rejected requests by reason
//! - `gateway_auth_refresh_failures_total` (counter): degraded-to-anonymous
//!   session refreshes
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - The routing rule that matched is a label, so redirect loops and rewrite
//!   volumes are visible per tenant class without high-cardinality labels

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, rule: &'static str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "rule" => rule
    )
    .increment(1);

    histogram!("gateway_request_duration_seconds", "rule" => rule)
        .record(start.elapsed().as_secs_f64());
}

/// Record a rate-limited rejection.
pub fn record_rate_limited(reason: &'static str) {
    counter!("gateway_rate_limited_total", "reason" => reason).increment(1);
}

/// Record a session refresh that degraded to anonymous.
pub fn record_auth_refresh_failure() {
    counter!("gateway_auth_refresh_failures_total").increment(1);
}

//! Rate limiting middleware.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::http::server::AppState;
use crate::observability::metrics;

/// A simple token bucket rate limiter.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Per-client-IP buckets. Lives outside the hot-swapped state so buckets
/// survive config reloads; limits are read live from config on each check.
#[derive(Default)]
pub struct RateLimiterState {
    buckets: Mutex<HashMap<IpAddr, TokenBucket>>,
}

impl RateLimiterState {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self, ip: IpAddr, rps: f64, burst: f64) -> bool {
        let mut buckets = self.buckets.lock().expect("rate limiter mutex poisoned");
        let bucket = buckets.entry(ip).or_insert_with(|| TokenBucket::new(burst));

        bucket.try_acquire(burst, rps)
    }
}

/// Middleware function for per-IP rate limiting.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let config = state.inner.load().config.rate_limit.clone();
    if !config.enabled {
        return next.run(request).await;
    }

    let rps = f64::from(config.requests_per_second);
    let burst = f64::from(config.burst_size).max(rps);

    if state.limiter.check(addr.ip(), rps, burst) {
        next.run(request).await
    } else {
        tracing::warn!(client = %addr.ip(), "Rate limit exceeded");
        metrics::record_rate_limited("rps_limit");
        let mut response = Response::new(Body::from("Rate limit exceeded"));
        *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
        response
    }
}

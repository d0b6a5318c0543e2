//! Security response headers.
//!
//! # Responsibilities
//! - Add standard hardening headers to every response
//! - Leave upstream-set values alone (insert-if-absent)

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::http::server::AppState;

const HEADERS: [(&str, &str); 3] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
];

pub async fn security_headers_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let enabled = state.inner.load().config.security.enable_headers;

    let mut response = next.run(req).await;

    if enabled {
        for (name, value) in HEADERS {
            response
                .headers_mut()
                .entry(name)
                .or_insert(HeaderValue::from_static(value));
        }
    }

    response
}

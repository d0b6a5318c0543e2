//! Gateway-origin responses.
//!
//! # Responsibilities
//! - Build redirect responses with localized plain-text bodies
//! - Attach tenant identification and caching headers
//! - Map upstream connection failures to 502

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;

use crate::i18n::Translator;
use crate::routing::decision::{TENANT_CACHE_CONTROL, X_SUBDOMAIN};

/// Build a redirect with a localized body for clients that do not follow it.
pub fn redirect(status: u16, location: &str, translator: &Translator<'_>) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::TEMPORARY_REDIRECT);
    let location = HeaderValue::from_str(location)
        .unwrap_or_else(|_| HeaderValue::from_static("/"));

    let mut response = Response::new(Body::from(translator.text("redirecting").to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(header::LOCATION, location);
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// 502 for upstream connection failures.
pub fn bad_gateway(translator: &Translator<'_>) -> Response {
    let mut response = Response::new(Body::from(translator.text("bad_gateway").to_string()));
    *response.status_mut() = StatusCode::BAD_GATEWAY;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Stamp tenant traffic: identification plus the storefront caching policy.
pub fn apply_tenant_headers(response: &mut Response, tenant: &str) {
    if let Ok(value) = HeaderValue::from_str(tenant) {
        response.headers_mut().insert(X_SUBDOMAIN, value);
    }
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(TENANT_CACHE_CONTROL),
    );
}

/// Relay rotated auth cookies verbatim onto the outgoing response.
pub fn relay_set_cookies(response: &mut Response, set_cookies: &[String]) {
    for cookie in set_cookies {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
}

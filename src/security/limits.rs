//! Request size limits.
//!
//! # Responsibilities
//! - Enforce the configured maximum request body size
//! - Return 413 Payload Too Large before full body read

use tower_http::limit::RequestBodyLimitLayer;

/// Body size cap for the main router stack.
pub fn body_limit_layer(max_body_size: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(max_body_size)
}

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → request.rs (request ID layer)
//!     → routing pipeline decides (pass / forward / redirect / rewrite)
//!     → response.rs (redirect bodies, tenant headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;

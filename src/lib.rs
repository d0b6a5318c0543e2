//! Edge gateway for the multi-tenant storefront platform.

pub mod admin;
pub mod auth;
pub mod config;
pub mod http;
pub mod i18n;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

//! Admin endpoints.
//!
//! Bearer-authenticated, bound to their own (loopback) address. Besides the
//! usual status/config introspection, `/admin/decide` dry-runs the routing
//! pipeline so each rule's priority can be exercised without real traffic.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/rules", get(get_rules))
        .route("/admin/config", get(get_config))
        .route("/admin/decide", get(get_decision))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .with_state(state)
}

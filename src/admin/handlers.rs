use std::sync::atomic::Ordering;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::session::SessionState;
use crate::http::server::AppState;
use crate::routing::decision::Decision;
use crate::routing::host;
use crate::routing::rules::RequestContext;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub requests_total: usize,
}

#[derive(Serialize)]
pub struct RuleInfo {
    pub position: usize,
    pub name: &'static str,
    pub summary: String,
}

#[derive(Deserialize)]
pub struct DecideParams {
    pub host: Option<String>,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub authenticated: bool,
    pub accept_language: Option<String>,
}

fn default_path() -> String {
    "/".to_string()
}

#[derive(Serialize)]
pub struct DecisionReport {
    pub locale: String,
    pub decision: Decision,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let inner = state.inner.load_full();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        requests_total: inner.request_count.load(Ordering::Relaxed),
    })
}

pub async fn get_rules(State(state): State<AppState>) -> Json<Vec<RuleInfo>> {
    let inner = state.inner.load_full();
    let rules = inner
        .pipeline
        .rules()
        .enumerate()
        .map(|(i, rule)| RuleInfo {
            position: i + 1,
            name: rule.name(),
            summary: rule.describe(),
        })
        .collect();

    Json(rules)
}

pub async fn get_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    let inner = state.inner.load_full();
    let mut config = inner.config.clone();
    config.admin.api_key = "<redacted>".to_string();

    Json(serde_json::to_value(&config).unwrap_or_default())
}

/// Dry-run the routing pipeline for a hypothetical request.
pub async fn get_decision(
    State(state): State<AppState>,
    Query(params): Query<DecideParams>,
) -> Json<DecisionReport> {
    let inner = state.inner.load_full();

    let class = host::classify(
        params.host.as_deref(),
        &inner.config.routing.base_domain,
        &inner.config.routing.reserved_labels,
    );

    let session = if params.authenticated {
        SessionState::Authenticated {
            user_id: "dry-run".to_string(),
        }
    } else {
        SessionState::Anonymous
    };

    let (path, query) = match params.path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (params.path.as_str(), None),
    };

    let ctx = RequestContext::new(
        class,
        path,
        query,
        params.accept_language.as_deref(),
        &inner.locales,
        session,
    );
    let decision = inner.pipeline.decide(&ctx);

    Json(DecisionReport {
        locale: ctx.locale.tag,
        decision,
    })
}

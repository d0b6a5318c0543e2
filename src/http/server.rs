//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all gateway handler
//! - Wire up middleware (tracing, request ID, limits, security headers)
//! - Build the request context and run the routing rule pipeline
//! - Apply the decision: redirect, rewrite, or forward to the renderer
//! - Relay rotated session cookies onto the outgoing response
//! - Hot-swap compiled state on config reload without dropping requests

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{
        header,
        uri::{Authority, PathAndQuery, Scheme},
        HeaderValue, Request, Uri,
    },
    middleware,
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::client::{AuthBackend, AuthError, HttpAuthBackend};
use crate::auth::session::{SessionCookies, SessionVerdict};
use crate::config::schema::GatewayConfig;
use crate::http::request::{RequestId, RequestIdLayer};
use crate::http::response;
use crate::i18n::{TranslationResources, Translator};
use crate::observability::metrics;
use crate::routing::decision::{RouteAction, X_SUBDOMAIN};
use crate::routing::host::{self, HostClass};
use crate::routing::locale::LocaleSet;
use crate::routing::rules::{self, RequestContext, RulePipeline};
use crate::security::headers::security_headers_middleware;
use crate::security::limits::body_limit_layer;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};

/// Error type for server construction. Request-time failures never surface
/// here; they resolve to gateway responses.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid upstream address: {0}")]
    InvalidUpstream(String),
}

/// Compiled per-config state, swapped atomically on reload.
pub struct GatewayState {
    pub config: GatewayConfig,
    pub pipeline: RulePipeline,
    pub locales: LocaleSet,
    pub translations: TranslationResources,
    pub auth: Arc<dyn AuthBackend>,
    pub client: Client<HttpConnector, Body>,
    pub upstream_authority: Authority,
    pub request_count: AtomicUsize,
}

impl GatewayState {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ServerError> {
        let pipeline = RulePipeline::from_config(config);
        let locales = LocaleSet::new(
            config.locales.supported.clone(),
            config.locales.default.clone(),
        );
        let translations = TranslationResources::builtin(&config.locales);
        let auth: Arc<dyn AuthBackend> = Arc::new(HttpAuthBackend::from_config(&config.auth)?);

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let upstream_authority = Authority::from_str(&config.upstream.address)
            .map_err(|_| ServerError::InvalidUpstream(config.upstream.address.clone()))?;

        Ok(Self {
            config: config.clone(),
            pipeline,
            locales,
            translations,
            auth,
            client,
            upstream_authority,
            request_count: AtomicUsize::new(0),
        })
    }
}

/// Application state injected into handlers.
///
/// `inner` is hot-swapped on reload; the rate limiter lives beside it so
/// buckets survive reloads.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<GatewayState>>,
    pub limiter: Arc<RateLimiterState>,
}

/// HTTP server for the edge gateway.
pub struct HttpServer {
    state: AppState,
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let state = AppState {
            inner: Arc::new(ArcSwap::from_pointee(GatewayState::from_config(&config)?)),
            limiter: Arc::new(RateLimiterState::new()),
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            state,
            router,
            config,
        })
    }

    /// Shared state, for mounting the admin surface.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state.clone())
            .layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                state,
                security_headers_middleware,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(body_limit_layer(config.security.max_body_size))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Reload events on `config_updates` swap the compiled state in place;
    /// the listener and middleware stack are fixed for the process lifetime.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        spawn_reload_task(self.state.clone(), config_updates);

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS termination.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: axum_server::tls_rustls::RustlsConfig,
        config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        spawn_reload_task(self.state.clone(), config_updates);

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
            drain.graceful_shutdown(Some(Duration::from_secs(30)));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(
                self.router
                    .into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

fn spawn_reload_task(
    state: AppState,
    mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
) {
    tokio::spawn(async move {
        while let Some(new_config) = config_updates.recv().await {
            match GatewayState::from_config(&new_config) {
                Ok(new_state) => {
                    state.inner.store(Arc::new(new_state));
                    tracing::info!("Configuration reloaded");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Rejected reloaded configuration");
                }
            }
        }
    });
}

/// Main gateway handler.
/// Builds the request context, runs the rule pipeline, applies the decision.
async fn gateway_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    let start = Instant::now();
    let inner = state.inner.load_full();
    inner.request_count.fetch_add(1, Ordering::Relaxed);

    let method = req.method().to_string();
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let accept_language = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    // 1. Classify the host and check for bypass traffic.
    let host_class = host::classify(
        host.as_deref(),
        &inner.config.routing.base_domain,
        &inner.config.routing.reserved_labels,
    );
    let bypassed = rules::is_bypass(&path, &inner.config.routing.bypass_prefixes);

    // 2. Refresh the session, but only for primary-domain page traffic.
    //    Failures degrade to anonymous inside the client.
    let verdict = if !bypassed && host_class == HostClass::Primary {
        let cookies = SessionCookies::from_headers(
            req.headers(),
            &inner.config.auth.access_cookie,
            &inner.config.auth.refresh_cookie,
        );
        inner.auth.refresh(&cookies).await
    } else {
        SessionVerdict::default()
    };

    // 3. Run the pipeline over the immutable context.
    let ctx = RequestContext::new(
        host_class,
        &path,
        query.as_deref(),
        accept_language.as_deref(),
        &inner.locales,
        verdict.state.clone(),
    );
    let decision = inner.pipeline.decide(&ctx);

    tracing::debug!(
        request_id = %request_id,
        host = host.as_deref().unwrap_or("-"),
        path = %path,
        rule = decision.rule,
        action = decision.action.kind(),
        "Routing decision"
    );

    let translator = inner.translations.lookup(&ctx.locale.tag);

    // 4. Apply the decision.
    let mut resp = match &decision.action {
        RouteAction::Pass => forward(&inner, req, None, None, translator).await,
        RouteAction::Forward { tenant } => {
            forward(&inner, req, None, tenant.as_deref(), translator).await
        }
        RouteAction::Rewrite { path, tenant } => {
            forward(&inner, req, Some(path.as_str()), Some(tenant.as_str()), translator).await
        }
        RouteAction::Redirect { location, status } => {
            response::redirect(*status, location, &translator)
        }
    };

    // 5. Relay rotated session cookies regardless of outcome.
    response::relay_set_cookies(&mut resp, &verdict.set_cookies);

    metrics::record_request(&method, resp.status().as_u16(), decision.rule, start);
    resp
}

/// Forward a request to the upstream renderer, optionally rewriting the path
/// and stamping tenant headers. Connection failures become a localized 502.
async fn forward(
    inner: &GatewayState,
    mut req: Request<Body>,
    rewrite_path: Option<&str>,
    tenant: Option<&str>,
    translator: Translator<'_>,
) -> Response {
    let mut parts = req.uri().clone().into_parts();
    parts.scheme = Some(Scheme::HTTP);
    parts.authority = Some(inner.upstream_authority.clone());

    if let Some(new_path) = rewrite_path {
        let path_and_query = match req.uri().query() {
            Some(q) => format!("{}?{}", new_path, q),
            None => new_path.to_string(),
        };
        parts.path_and_query = PathAndQuery::from_str(&path_and_query).ok();
    }
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }

    let uri = match Uri::from_parts(parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build upstream URI");
            return response::bad_gateway(&translator);
        }
    };
    *req.uri_mut() = uri;

    // The renderer resolves tenant data from this header.
    if let Some(label) = tenant {
        if let Ok(value) = HeaderValue::from_str(label) {
            req.headers_mut().insert(X_SUBDOMAIN, value);
        }
    }

    match inner.client.request(req).await {
        Ok(upstream) => {
            let (head, body) = upstream.into_parts();
            let mut response = Response::from_parts(head, Body::new(body));
            if let Some(label) = tenant {
                response::apply_tenant_headers(&mut response, label);
            }
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "Upstream request failed");
            response::bad_gateway(&translator)
        }
    }
}

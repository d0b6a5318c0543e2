//! Auth backend client.
//!
//! # Responsibilities
//! - One refresh round trip per primary-domain request, carrying the cookie
//!   pair to the external auth service
//! - Map a 2xx identity response to `Authenticated`, everything else to
//!   `Anonymous` (fail open for routing, never an error page)
//! - Capture replacement `Set-Cookie` headers verbatim for relay
//!
//! # Design Decisions
//! - No retries; every decision is a function of one round trip (or none)
//! - The trait seam exists so the gate logic can be driven without a network

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::SET_COOKIE;
use serde::Deserialize;
use url::Url;

use crate::auth::session::{SessionCookies, SessionState, SessionVerdict};
use crate::config::schema::AuthConfig;
use crate::observability::metrics;

/// Error type for auth client construction. Runtime refresh failures are not
/// errors; they resolve to an anonymous verdict.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid auth endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("failed to build auth client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Reads the cookie-carried session and returns the current identity.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn refresh(&self, cookies: &SessionCookies) -> SessionVerdict;
}

/// Identity payload returned by the auth service's session endpoint.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    user_id: String,
}

/// HTTP client for the external auth service.
pub struct HttpAuthBackend {
    session_url: Url,
    client: reqwest::Client,
    access_cookie: String,
    refresh_cookie: String,
}

impl HttpAuthBackend {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let mut base = Url::parse(&config.endpoint)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let session_url = base.join("session")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            session_url,
            client,
            access_cookie: config.access_cookie.clone(),
            refresh_cookie: config.refresh_cookie.clone(),
        })
    }

    fn cookie_header(&self, cookies: &SessionCookies) -> String {
        let mut parts = Vec::with_capacity(2);
        if let Some(access) = &cookies.access {
            parts.push(format!("{}={}", self.access_cookie, access));
        }
        if let Some(refresh) = &cookies.refresh {
            parts.push(format!("{}={}", self.refresh_cookie, refresh));
        }
        parts.join("; ")
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn refresh(&self, cookies: &SessionCookies) -> SessionVerdict {
        // No tokens, no round trip.
        if cookies.is_empty() {
            return SessionVerdict::default();
        }

        let response = self
            .client
            .get(self.session_url.clone())
            .header(reqwest::header::COOKIE, self.cookie_header(cookies))
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "Session refresh failed, treating as anonymous");
                metrics::record_auth_refresh_failure();
                return SessionVerdict::default();
            }
        };

        let set_cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Session rejected by auth backend");
            // An expired session may still come with clearing cookies.
            return SessionVerdict {
                state: SessionState::Anonymous,
                set_cookies,
            };
        }

        match response.json::<SessionResponse>().await {
            Ok(session) => SessionVerdict {
                state: SessionState::Authenticated {
                    user_id: session.user_id,
                },
                set_cookies,
            },
            Err(e) => {
                tracing::debug!(error = %e, "Malformed session response, treating as anonymous");
                metrics::record_auth_refresh_failure();
                SessionVerdict {
                    state: SessionState::Anonymous,
                    set_cookies,
                }
            }
        }
    }
}

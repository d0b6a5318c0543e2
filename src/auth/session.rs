//! Session token cookies.
//!
//! The session is an opaque access/refresh token pair owned and rotated by
//! the external auth backend. This module only reads the pair out of the
//! request cookie jar and carries rotated `Set-Cookie` values back as data.

use axum::http::{header, HeaderMap};

/// The token pair read from the request's cookie jar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl SessionCookies {
    /// Extract the configured token cookies from the request headers.
    ///
    /// All `Cookie` headers are scanned; later occurrences of a name win,
    /// matching how user agents append cookies.
    pub fn from_headers(headers: &HeaderMap, access_name: &str, refresh_name: &str) -> Self {
        let mut cookies = Self::default();

        for value in headers.get_all(header::COOKIE) {
            let Ok(raw) = value.to_str() else {
                continue;
            };
            for (name, value) in parse_cookie_header(raw) {
                if name == access_name {
                    cookies.access = Some(value.to_string());
                } else if name == refresh_name {
                    cookies.refresh = Some(value.to_string());
                }
            }
        }

        cookies
    }

    /// True when neither token is present; refresh can be skipped entirely.
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

/// Iterate `name=value` pairs in a `Cookie` header value.
pub fn parse_cookie_header(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    raw.split(';').filter_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name, value.trim()))
    })
}

/// Authentication state derived from the refresh call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated { user_id: String },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Anonymous
    }
}

/// Result of a session refresh: the derived state plus any replacement
/// cookies the backend issued, to be relayed verbatim on the response.
#[derive(Debug, Clone, Default)]
pub struct SessionVerdict {
    pub state: SessionState,
    pub set_cookies: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_extracts_token_pair() {
        let headers = headers("theme=dark; access_token=abc; refresh_token=def");
        let cookies = SessionCookies::from_headers(&headers, "access_token", "refresh_token");
        assert_eq!(cookies.access.as_deref(), Some("abc"));
        assert_eq!(cookies.refresh.as_deref(), Some("def"));
    }

    #[test]
    fn test_missing_cookies_are_empty() {
        let cookies = SessionCookies::from_headers(
            &headers("theme=dark"),
            "access_token",
            "refresh_token",
        );
        assert!(cookies.is_empty());
    }

    #[test]
    fn test_multiple_cookie_headers() {
        let mut map = headers("access_token=abc");
        map.append(
            header::COOKIE,
            HeaderValue::from_static("refresh_token=def"),
        );
        let cookies = SessionCookies::from_headers(&map, "access_token", "refresh_token");
        assert_eq!(cookies.access.as_deref(), Some("abc"));
        assert_eq!(cookies.refresh.as_deref(), Some("def"));
    }

    #[test]
    fn test_malformed_pairs_are_skipped() {
        let pairs: Vec<_> = parse_cookie_header("a=1; garbage; =nope; b=2").collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }
}

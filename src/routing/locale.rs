//! Locale resolution.
//!
//! # Responsibilities
//! - Detect a supported locale prefix on the request path
//! - Negotiate `Accept-Language` against the supported set (q-values)
//! - Fall back to the default locale; resolution is total and never errors
//!
//! # Design Decisions
//! - Priority: path prefix → Accept-Language → default
//! - Unparseable Accept-Language headers degrade silently to the default
//! - Matching is case-insensitive; "en-US" satisfies supported tag "en"

/// The supported locale set plus its default, compiled from config.
#[derive(Debug, Clone)]
pub struct LocaleSet {
    supported: Vec<String>,
    default: String,
}

/// Outcome of locale resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale {
    /// The resolved tag, always a member of the supported set.
    pub tag: String,
    /// Whether the path already carried this locale as its first segment.
    pub from_path: bool,
}

impl LocaleSet {
    pub fn new(supported: Vec<String>, default: String) -> Self {
        Self { supported, default }
    }

    pub fn default_locale(&self) -> &str {
        &self.default
    }

    /// If the path starts with a supported locale segment, return the tag and
    /// the remainder of the path ("/" when the prefix is the whole path).
    pub fn split_prefix<'a>(&self, path: &'a str) -> Option<(&str, &'a str)> {
        let rest = path.strip_prefix('/')?;
        let (segment, remainder) = match rest.split_once('/') {
            Some((segment, remainder)) => (segment, remainder),
            None => (rest, ""),
        };

        let tag = self
            .supported
            .iter()
            .find(|tag| tag.eq_ignore_ascii_case(segment))?;

        if remainder.is_empty() {
            Some((tag, "/"))
        } else {
            // Re-borrow from the original path to keep the leading slash.
            Some((tag, &path[1 + segment.len()..]))
        }
    }

    /// Negotiate an `Accept-Language` header value against the supported set.
    ///
    /// Returns the default locale when the header is absent, malformed, or
    /// matches nothing.
    pub fn negotiate(&self, accept_language: Option<&str>) -> &str {
        let Some(header) = accept_language else {
            return &self.default;
        };

        let mut candidates: Vec<(&str, f32)> = header
            .split(',')
            .filter_map(|entry| {
                let entry = entry.trim();
                if entry.is_empty() {
                    return None;
                }
                match entry.split_once(';') {
                    Some((tag, params)) => {
                        let q = params
                            .trim()
                            .strip_prefix("q=")
                            .and_then(|v| v.trim().parse::<f32>().ok())
                            .unwrap_or(1.0);
                        Some((tag.trim(), q))
                    }
                    None => Some((entry, 1.0)),
                }
            })
            .filter(|(tag, q)| !tag.is_empty() && *q > 0.0)
            .collect();

        // Stable sort keeps header order for equal q-values.
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        for (tag, _q) in candidates {
            if let Some(supported) = self.match_tag(tag) {
                return supported;
            }
        }

        &self.default
    }

    /// Resolve the locale for a request: path prefix first, then negotiation.
    pub fn resolve(&self, path: &str, accept_language: Option<&str>) -> ResolvedLocale {
        if let Some((tag, _rest)) = self.split_prefix(path) {
            return ResolvedLocale {
                tag: tag.to_string(),
                from_path: true,
            };
        }

        ResolvedLocale {
            tag: self.negotiate(accept_language).to_string(),
            from_path: false,
        }
    }

    /// Match a header tag against the supported set, exact first, then by
    /// primary subtag ("en-US" → "en"). A bare wildcard matches the default.
    fn match_tag(&self, tag: &str) -> Option<&str> {
        if tag == "*" {
            return Some(&self.default);
        }
        if let Some(exact) = self.supported.iter().find(|s| s.eq_ignore_ascii_case(tag)) {
            return Some(exact);
        }
        let primary = tag.split('-').next()?;
        self.supported
            .iter()
            .find(|s| s.eq_ignore_ascii_case(primary))
            .map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> LocaleSet {
        LocaleSet::new(vec!["en".to_string(), "fr".to_string()], "en".to_string())
    }

    #[test]
    fn test_split_prefix_on_nested_path() {
        let set = locales();
        assert_eq!(set.split_prefix("/en/pricing"), Some(("en", "/pricing")));
        assert_eq!(set.split_prefix("/fr"), Some(("fr", "/")));
    }

    #[test]
    fn test_split_prefix_rejects_unsupported() {
        let set = locales();
        assert_eq!(set.split_prefix("/de/pricing"), None);
        assert_eq!(set.split_prefix("/pricing"), None);
        assert_eq!(set.split_prefix("/"), None);
    }

    #[test]
    fn test_split_prefix_does_not_match_longer_segment() {
        // "/enterprise" must not be mistaken for the "en" prefix.
        assert_eq!(locales().split_prefix("/enterprise"), None);
    }

    #[test]
    fn test_negotiate_prefers_highest_q() {
        let set = locales();
        assert_eq!(set.negotiate(Some("fr;q=0.9, en;q=0.8")), "fr");
        assert_eq!(set.negotiate(Some("en, fr;q=0.5")), "en");
    }

    #[test]
    fn test_negotiate_matches_primary_subtag() {
        let set = locales();
        assert_eq!(set.negotiate(Some("fr-CA,de;q=0.9")), "fr");
    }

    #[test]
    fn test_negotiate_falls_back_to_default() {
        let set = locales();
        assert_eq!(set.negotiate(None), "en");
        assert_eq!(set.negotiate(Some("de, ja;q=0.8")), "en");
        assert_eq!(set.negotiate(Some(";;;garbage;;;")), "en");
    }

    #[test]
    fn test_negotiate_wildcard() {
        assert_eq!(locales().negotiate(Some("*")), "en");
    }

    #[test]
    fn test_resolve_prefers_path_prefix() {
        let set = locales();
        let resolved = set.resolve("/fr/pricing", Some("en"));
        assert_eq!(resolved.tag, "fr");
        assert!(resolved.from_path);

        let resolved = set.resolve("/pricing", Some("fr"));
        assert_eq!(resolved.tag, "fr");
        assert!(!resolved.from_path);
    }
}

//! Translation resources for gateway-origin responses.
//!
//! # Design Decisions
//! - Resources are an explicit value built once at startup and injected
//!   through application state; there is no module-level singleton
//! - Locale selection is a pure function: (resources, locale) → lookup handle
//! - Lookups fall back to the default locale, then to the key itself, so a
//!   missing entry can never panic a request

use std::collections::HashMap;

use crate::config::schema::LocaleConfig;

type Catalog = HashMap<&'static str, &'static str>;

/// The compiled message catalogs for every supported locale.
#[derive(Debug, Clone)]
pub struct TranslationResources {
    catalogs: HashMap<String, Catalog>,
    default_locale: String,
}

impl TranslationResources {
    /// Build the built-in catalogs, filtered to the configured locale set.
    /// Locales without a catalog fall back to the default at lookup time.
    pub fn builtin(config: &LocaleConfig) -> Self {
        let mut catalogs = HashMap::new();

        for tag in &config.supported {
            if let Some(catalog) = builtin_catalog(tag) {
                catalogs.insert(tag.clone(), catalog);
            }
        }

        // The default locale always has a catalog, even if misconfigured.
        catalogs
            .entry(config.default.clone())
            .or_insert_with(|| builtin_catalog("en").unwrap_or_default());

        Self {
            catalogs,
            default_locale: config.default.clone(),
        }
    }

    /// Pure locale switch: returns a lookup handle bound to one locale.
    pub fn lookup(&self, locale: &str) -> Translator<'_> {
        Translator {
            catalog: self.catalogs.get(locale),
            fallback: self.catalogs.get(&self.default_locale),
        }
    }
}

/// A lookup handle for a single locale.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    catalog: Option<&'a Catalog>,
    fallback: Option<&'a Catalog>,
}

impl Translator<'_> {
    /// Resolve a message key; falls back to the default locale, then to the
    /// key itself.
    pub fn text(&self, key: &'static str) -> &str {
        self.catalog
            .and_then(|c| c.get(key))
            .or_else(|| self.fallback.and_then(|c| c.get(key)))
            .copied()
            .unwrap_or(key)
    }
}

fn builtin_catalog(tag: &str) -> Option<Catalog> {
    match tag {
        "en" => Some(HashMap::from([
            ("redirecting", "Redirecting..."),
            ("bad_gateway", "The storefront backend is unavailable."),
        ])),
        "fr" => Some(HashMap::from([
            ("redirecting", "Redirection..."),
            ("bad_gateway", "Le serveur de la boutique est indisponible."),
        ])),
        _ => None,
    }
}

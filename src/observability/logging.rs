//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Default the filter from config; `RUST_LOG` wins when set

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::schema::ObservabilityConfig;

/// Initialize the global tracing subscriber.
pub fn init(config: &ObservabilityConfig) {
    let default_filter = format!(
        "storefront_edge={},tower_http={}",
        config.log_level, config.log_level
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

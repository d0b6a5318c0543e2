//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT, SIGHUP)
//! - SIGTERM/SIGINT trigger graceful shutdown
//! - SIGHUP reloads the config file onto the update channel
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP with no config file is a no-op; defaults cannot be "reloaded"

use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;
use crate::lifecycle::shutdown::Shutdown;

/// Spawn the shutdown signal listener (SIGTERM/SIGINT).
pub fn spawn_shutdown_listener(shutdown: Shutdown) {
    tokio::spawn(async move {
        wait_for_termination().await;
        tracing::info!("Termination signal received");
        shutdown.trigger();
    });
}

async fn wait_for_termination() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

/// Spawn the SIGHUP listener feeding reloaded configs onto the update channel.
pub fn spawn_reload_listener(
    config_path: Option<PathBuf>,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
) {
    #[cfg(unix)]
    {
        let Some(path) = config_path else {
            return;
        };

        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sighup = match signal(SignalKind::hangup()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGHUP handler");
                    return;
                }
            };

            while sighup.recv().await.is_some() {
                tracing::info!("SIGHUP received, reloading configuration");
                match load_config(&path) {
                    Ok(config) => {
                        let _ = update_tx.send(config);
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to reload config: {}. Keeping current configuration.",
                            e
                        );
                    }
                }
            }
        });
    }

    #[cfg(not(unix))]
    {
        let _ = (config_path, update_tx);
    }
}

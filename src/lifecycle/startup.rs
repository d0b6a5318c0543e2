//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize subsystems in dependency order
//! - Start background tasks (watcher, signal listeners, admin)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener starts last (traffic only when ready)

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::admin;
use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;
use crate::config::watcher::ConfigWatcher;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::observability::{logging, metrics};

/// Boot parameters from the command line.
pub struct BootOptions {
    /// Config file path; built-in defaults apply when omitted.
    pub config_path: Option<PathBuf>,
}

/// Boot the gateway and serve until shutdown.
pub async fn run(opts: BootOptions) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Config first; nothing else starts on a bad file.
    let config = match &opts.config_path {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    // 2. Logging, so everything after can trace.
    logging::init(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "storefront-edge starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_domain = %config.routing.base_domain,
        upstream = %config.upstream.address,
        "Configuration loaded"
    );

    // 3. Metrics exporter.
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // 4. Shutdown and reload plumbing.
    let shutdown = Shutdown::new();
    signals::spawn_shutdown_listener(shutdown.clone());

    let (update_tx, update_rx) = mpsc::unbounded_channel();
    signals::spawn_reload_listener(opts.config_path.clone(), update_tx.clone());

    // The watcher handle must stay alive for the process lifetime.
    let _watcher = match &opts.config_path {
        Some(path) => Some(ConfigWatcher::new(path, update_tx).run()?),
        None => None,
    };

    // 5. Server core; admin mounts the same shared state.
    let server = HttpServer::new(config.clone())?;

    if config.admin.enabled {
        let admin_router = admin::setup_admin_router(server.state());
        let admin_addr: SocketAddr = config.admin.bind_address.parse()?;
        let admin_listener = TcpListener::bind(admin_addr).await?;
        let mut admin_shutdown = shutdown.subscribe();

        tracing::info!(address = %admin_addr, "Admin endpoints starting");
        tokio::spawn(async move {
            let _ = axum::serve(admin_listener, admin_router.into_make_service())
                .with_graceful_shutdown(async move {
                    let _ = admin_shutdown.recv().await;
                })
                .await;
        });
    }

    // 6. Listener last.
    let server_shutdown = shutdown.subscribe();
    match &config.listener.tls {
        Some(tls) => {
            let rustls = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &tls.cert_path,
                &tls.key_path,
            )
            .await?;
            let addr: SocketAddr = config.listener.bind_address.parse()?;
            server.run_tls(addr, rustls, update_rx, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            server.run(listener, update_rx, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

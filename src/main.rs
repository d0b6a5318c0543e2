//! Edge gateway for the multi-tenant storefront platform.
//!
//! Classifies every inbound request before it reaches the rendering backend:
//! asset and API traffic passes untouched, tenant subdomains rewrite to their
//! canonical product route, primary-domain traffic gets locale resolution and
//! the authentication gate. All failure modes degrade to a safe routing
//! decision; the renderer owns user-facing errors.

use std::path::PathBuf;

use clap::Parser;

use storefront_edge::lifecycle::startup::{self, BootOptions};

#[derive(Parser)]
#[command(name = "storefront-edge")]
#[command(about = "Edge gateway for subdomain storefronts", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file; built-in defaults apply when
    /// omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    startup::run(BootOptions {
        config_path: cli.config,
    })
    .await
}

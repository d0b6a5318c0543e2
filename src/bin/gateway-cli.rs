use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the storefront edge gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[arg(short, long, default_value = "admin-secret-key")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway system status
    Status,
    /// List routing rules in evaluation order
    Rules,
    /// Show the active configuration (secrets redacted)
    Config,
    /// Dry-run the routing pipeline for a host and path
    Decide {
        /// Host header to classify (e.g., "acme.example.com")
        #[arg(long)]
        host: Option<String>,

        /// Request path, optionally with a query string
        #[arg(long, default_value = "/")]
        path: String,

        /// Evaluate as a signed-in user
        #[arg(long)]
        authenticated: bool,

        /// Accept-Language header to negotiate against
        #[arg(long)]
        accept_language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    match cli.command {
        Commands::Status => {
            let res = client
                .get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Rules => {
            let res = client
                .get(format!("{}/admin/rules", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Config => {
            let res = client
                .get(format!("{}/admin/config", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Decide {
            host,
            path,
            authenticated,
            accept_language,
        } => {
            let mut query: Vec<(&str, String)> = vec![
                ("path", path),
                ("authenticated", authenticated.to_string()),
            ];
            if let Some(host) = host {
                query.push(("host", host));
            }
            if let Some(al) = accept_language {
                query.push(("accept_language", al));
            }

            let res = client
                .get(format!("{}/admin/decide", cli.url))
                .query(&query)
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

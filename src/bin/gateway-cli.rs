use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use edge_gateway::config::load_or_default;
use edge_gateway::rewrite::{derive_id, RewriteEngine};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Companion CLI for the edge gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the short source id derived from an API URL
    DeriveId { url: String },
    /// Rewrite a local config document offline
    Rewrite {
        file: PathBuf,
        #[arg(short, long)]
        prefix: String,
        /// Gateway config supplying the URL fields to rewrite
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Fetch a config document through a running gateway
    Config {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
        #[arg(short, long, default_value = "1")]
        format: String,
        #[arg(short, long)]
        source: Option<String>,
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// Check gateway liveness
    Health {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::DeriveId { url } => {
            println!("{}", derive_id(&url));
        }
        Commands::Rewrite { file, prefix, config } => {
            let config = load_or_default(config.as_deref())?;
            let document: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let rewritten = RewriteEngine::from_config(&config.rewrite).rewrite(&document, &prefix);
            println!("{}", serde_json::to_string_pretty(&rewritten)?);
        }
        Commands::Config { url, format, source, prefix } => {
            let mut query = vec![("format", format)];
            if let Some(source) = source {
                query.push(("source", source));
            }
            if let Some(prefix) = prefix {
                query.push(("prefix", prefix));
            }
            let res = reqwest::Client::new()
                .get(format!("{}/", url.trim_end_matches('/')))
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health { url } => {
            let res = reqwest::get(format!("{}/health", url.trim_end_matches('/'))).await?;
            let status = res.status();
            println!("{} {}", status, res.text().await?);
            if !status.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

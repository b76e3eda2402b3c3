//! Edge gateway binary.
//!
//! ```text
//!     Client ──▶ http::server ──▶ routing::router ─┬─▶ preflight / health / docs
//!                                                  ├─▶ proxy::forwarder ──▶ upstream API
//!                                                  └─▶ pipeline ──▶ cache ──▶ config source
//!                                                                   └─▶ rewrite
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gateway::cache::{HttpFetcher, KvStore, MemoryKvStore};
use edge_gateway::config::load_or_default;
use edge_gateway::observability::{logging, metrics};
use edge_gateway::{HttpServer, Shutdown};

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Parser)]
#[command(name = "edge-gateway")]
#[command(about = "CORS relay and config-document rewriting gateway", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "EDGE_GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("edge-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        default_source = %config.sources.default_source,
        sources = config.sources.entries.len(),
        proxy_timeout_secs = config.timeouts.proxy_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();

    let store = if config.cache.enabled {
        let store = Arc::new(MemoryKvStore::new());
        spawn_purge_task(store.clone(), shutdown.subscribe());
        Some(store as Arc<dyn KvStore>)
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::with_components(config, store, Arc::new(HttpFetcher::default()));
    let result = server.run(listener, shutdown.subscribe()).await;

    shutdown.trigger();
    result?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn spawn_purge_task(store: Arc<MemoryKvStore>, mut shutdown: tokio::sync::broadcast::Receiver<()>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    store.purge_expired();
                    tracing::trace!(entries = store.len(), "Purged expired cache entries");
                }
                _ = shutdown.recv() => break,
            }
        }
    });
}

//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use edge_gateway::cache::{HttpFetcher, KvStore, MemoryKvStore};
use edge_gateway::config::{SourceEntry, SourcesConfig};
use edge_gateway::{GatewayConfig, HttpServer, Shutdown};

/// Origin every test gateway advertises, so loop checks never collide with
/// the ephemeral port of a mock upstream.
pub const GATEWAY_ORIGIN: &str = "http://gateway.test";

/// Serve `router` on an ephemeral local port.
pub async fn start_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Defaults plus a fixed public origin.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.listener.public_origin = Some(GATEWAY_ORIGIN.into());
    config
}

/// Point every source at `path` style documents on the mock upstream.
pub fn sources_on(upstream: SocketAddr, keys: &[&str], default_source: &str) -> SourcesConfig {
    SourcesConfig {
        default_source: default_source.into(),
        entries: keys
            .iter()
            .map(|key| {
                (
                    key.to_string(),
                    SourceEntry::Url(format!("http://{}/{}.json", upstream, key)),
                )
            })
            .collect(),
    }
}

/// Run a gateway with the in-memory store and the HTTP fetcher.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let store: Option<Arc<dyn KvStore>> = if config.cache.enabled {
        Some(Arc::new(MemoryKvStore::new()))
    } else {
        None
    };
    let server = HttpServer::with_components(config, store, Arc::new(HttpFetcher::default()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the server a moment to start accepting.
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

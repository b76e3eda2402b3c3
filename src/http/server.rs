//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (tracing, request ID, request deadline)
//! - Build the shared state (router, forwarder, config pipeline)
//! - Dispatch each request and record its outcome

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cache::{ConfigCache, KvStore, SourceFetcher};
use crate::config::{GatewayConfig, SourceRegistry};
use crate::http::docs;
use crate::http::request::{gateway_origin, request_id, UuidRequestId};
use crate::http::response;
use crate::lifecycle::shutdown::wait_for_shutdown;
use crate::observability::metrics;
use crate::pipeline::ConfigPipeline;
use crate::proxy::ProxyForwarder;
use crate::rewrite::{RewriteEngine, URL_MARKER};
use crate::routing::{Dispatch, GatewayRouter, QueryParams};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<GatewayRouter>,
    pub forwarder: Arc<ProxyForwarder>,
    pub pipeline: Arc<ConfigPipeline>,
    pub public_origin: Option<String>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server around an explicit store and fetcher.
    pub fn with_components(
        config: GatewayConfig,
        store: Option<Arc<dyn KvStore>>,
        fetcher: Arc<dyn SourceFetcher>,
    ) -> Self {
        let cache = ConfigCache::new(store, fetcher, &config.cache);
        let pipeline = ConfigPipeline::new(
            SourceRegistry::from_config(&config.sources),
            cache,
            RewriteEngine::from_config(&config.rewrite),
        );

        let state = AppState {
            router: Arc::new(GatewayRouter::new()),
            forwarder: Arc::new(ProxyForwarder::new(reqwest::Client::new(), &config)),
            pipeline: Arc::new(pipeline),
            public_origin: config.listener.public_origin.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            sources = self.config.sources.entries.len(),
            cache_enabled = self.config.cache.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Single entry point: classify the request and hand it to its component.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = QueryParams::parse(request.uri().query());

    let dispatch = state.router.classify(&method, &path, &query);
    let label = dispatch.label();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = label,
        "Dispatching request"
    );

    let origin = gateway_origin(state.public_origin.as_deref(), request.headers());
    let default_prefix = format!("{}/{}", origin, URL_MARKER);

    let response = match dispatch {
        Dispatch::Preflight => response::preflight(),
        Dispatch::Health => response::health(),
        Dispatch::Proxy { target } => match state.forwarder.forward(request, &target, &origin).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = ?e, "Proxy request rejected");
                e.into_response()
            }
        },
        Dispatch::Config { format } => match state
            .pipeline
            .render(&format, query.get("source"), query.get("prefix"), &default_prefix)
            .await
        {
            Ok(document) => response::json_document(&document),
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = ?e, "Config request failed");
                e.into_response()
            }
        },
        Dispatch::Docs => docs::page(&origin, &default_prefix, state.pipeline.registry()),
    };

    metrics::record_request(label, response.status().as_u16(), start_time);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::cache::FetchError;

    struct FixedFetcher;

    #[async_trait]
    impl SourceFetcher for FixedFetcher {
        async fn fetch_json(&self, _url: &str) -> Result<Value, FetchError> {
            Ok(json!({"sites": [{"api": "https://cj.lziapi.com/api.php"}]}))
        }
    }

    fn server() -> HttpServer {
        let mut config = GatewayConfig::default();
        config.listener.public_origin = Some("https://gw.example".into());
        HttpServer::with_components(config, None, Arc::new(FixedFetcher))
    }

    async fn call(uri: &str) -> Response {
        server()
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_request_id_is_set() {
        let response = call("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_config_rewrite_uses_public_origin() {
        let response = call("/?format=1").await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["sites"][0]["api"],
            "https://gw.example/p/lziapi?url=https://cj.lziapi.com/api.php"
        );
    }

    #[tokio::test]
    async fn test_loop_is_rejected_in_process() {
        let response = call("/?url=https%3A%2F%2Fgw.example%2Fhealth").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

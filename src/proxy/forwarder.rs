//! Upstream relay for `?url=` requests.
//!
//! # Responsibilities
//! - Validate the target before any network I/O
//! - Forward method, headers, and body (non-GET/HEAD) to the target
//! - Bound each attempt with the proxy timeout
//! - Relay status, sanitized headers, and body back to the client
//!
//! # Design Decisions
//! - Single attempt; callers retry if they want to
//! - Non-text bodies are streamed, text bodies are buffered and cleaned

use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request},
    response::Response,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::observability::metrics;
use crate::proxy::target::ProxyTarget;
use crate::routing::QueryParams;
use crate::security::headers::{forwarded_request_headers, is_text_like, relay_response_headers};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Relays requests to validated upstream targets.
#[derive(Debug, Clone)]
pub struct ProxyForwarder {
    client: reqwest::Client,
    timeout: Duration,
    max_body_size: usize,
    clean_text_bodies: bool,
}

impl ProxyForwarder {
    pub fn new(client: reqwest::Client, config: &GatewayConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(config.timeouts.proxy_secs),
            max_body_size: config.security.max_body_size,
            clean_text_bodies: config.proxy.clean_text_bodies,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Relay `request` to the target named by `target_param`.
    pub async fn forward(
        &self,
        request: Request<Body>,
        target_param: &str,
        gateway_origin: &str,
    ) -> Result<Response, GatewayError> {
        let start = Instant::now();

        ProxyTarget::validate(target_param, gateway_origin)?;
        let query = QueryParams::parse(request.uri().query());
        let target = ProxyTarget::resolve(target_param, gateway_origin, &query)?;

        let (parts, body) = request.into_parts();
        let body = if parts.method == Method::GET || parts.method == Method::HEAD {
            None
        } else {
            let bytes = axum::body::to_bytes(body, self.max_body_size)
                .await
                .map_err(|e| GatewayError::RequestBody(e.to_string()))?;
            Some(bytes)
        };

        let mut builder = self
            .client
            .request(parts.method.clone(), target.url().clone())
            .headers(forwarded_request_headers(&parts.headers));
        if let Some(bytes) = body {
            builder = builder.body(bytes);
        }
        let upstream_request = builder
            .build()
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        tracing::debug!(method = %parts.method, target = %target, "Relaying request");

        // Dropping the in-flight future on expiry aborts the upstream call.
        let upstream = match tokio::time::timeout(self.timeout, self.client.execute(upstream_request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(target = %target, error = %e, "Upstream request failed");
                metrics::record_proxy("error", start);
                return Err(GatewayError::Upstream(e.to_string()));
            }
            Err(_) => {
                tracing::warn!(target = %target, timeout = ?self.timeout, "Upstream request timed out");
                metrics::record_proxy("timeout", start);
                return Err(GatewayError::Upstream(format!(
                    "Upstream timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        let status = upstream.status();
        let headers = relay_response_headers(upstream.headers());
        let text_like = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_text_like);

        let body = if text_like {
            let bytes = upstream
                .bytes()
                .await
                .map_err(|e| GatewayError::Upstream(e.to_string()))?;
            if self.clean_text_bodies {
                Body::from(clean_text_body(bytes))
            } else {
                Body::from(bytes)
            }
        } else {
            Body::from_stream(upstream.bytes_stream())
        };

        tracing::debug!(target = %target, status = %status, elapsed = ?start.elapsed(), "Upstream responded");
        metrics::record_proxy("relayed", start);

        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Drop a leading byte-order mark and NUL characters from UTF-8 text.
/// Anything that is not valid UTF-8 is returned untouched.
pub fn clean_text_body(bytes: Bytes) -> Bytes {
    let Ok(text) = std::str::from_utf8(&bytes) else {
        return bytes;
    };

    let trimmed = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    if trimmed.len() == text.len() && !trimmed.contains('\0') {
        return bytes;
    }
    Bytes::from(trimmed.replace('\0', ""))
}

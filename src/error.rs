//! Request-level errors and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::cache::CacheError;
use crate::http::response::error_response;

/// Every failure a request can end in. None of them is fatal to the process.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Target is not an absolute http(s) URL.
    #[error("Invalid target URL")]
    InvalidTarget,

    /// Target points back at the gateway itself.
    #[error("Loop detected")]
    LoopDetected,

    /// Unrecognized `format` value.
    #[error("Invalid format")]
    UnknownFormat(String),

    /// Inbound body could not be read within the configured limit.
    #[error("Request body rejected")]
    RequestBody(String),

    /// Network error, timeout, or malformed target while relaying.
    #[error("Proxy Error")]
    Upstream(String),

    /// Config source could not be fetched or decoded.
    #[error("{0}")]
    SourceFetch(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidTarget => StatusCode::BAD_REQUEST,
            GatewayError::LoopDetected => StatusCode::BAD_REQUEST,
            GatewayError::UnknownFormat(_) => StatusCode::BAD_REQUEST,
            GatewayError::RequestBody(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::SourceFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn extra(&self) -> Map<String, Value> {
        let mut extra = Map::new();
        match self {
            GatewayError::Upstream(message) | GatewayError::RequestBody(message) => {
                extra.insert("message".to_string(), Value::String(message.clone()));
            }
            _ => {}
        }
        extra
    }
}

impl From<CacheError> for GatewayError {
    fn from(err: CacheError) -> Self {
        GatewayError::SourceFetch(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), &self.to_string(), self.extra())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FetchError;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upstream_error_envelope() {
        let response = GatewayError::Upstream("timed out".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await, json!({"error": "Proxy Error", "message": "timed out"}));
    }

    #[tokio::test]
    async fn test_validation_errors_are_400() {
        let response = GatewayError::LoopDetected.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Loop detected"}));
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_message() {
        let err: GatewayError = CacheError::from(FetchError::Status(503)).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"error": "Fetch failed: 503"}));
    }
}

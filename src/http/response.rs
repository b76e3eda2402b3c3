//! Locally generated responses.
//!
//! Every response built here carries the CORS header set. Error bodies use
//! the `{ "error": ..., ...extra }` envelope.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use serde_json::{Map, Value};

use crate::security::headers::apply_cors;

const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
const ERROR_CONTENT_TYPE: &str = "application/json; charset=utf-8";

fn with_cors(status: StatusCode, content_type: Option<&'static str>, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    if let Some(content_type) = content_type {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    apply_cors(headers);
    response
}

/// Preflight acknowledgement: 204, CORS headers only.
pub fn preflight() -> Response {
    with_cors(StatusCode::NO_CONTENT, None, Body::empty())
}

/// Liveness check.
pub fn health() -> Response {
    with_cors(StatusCode::OK, Some("text/plain; charset=utf-8"), Body::from("OK"))
}

pub fn html(page: String) -> Response {
    with_cors(StatusCode::OK, Some("text/html; charset=utf-8"), Body::from(page))
}

/// Compact JSON document with status 200.
pub fn json_document(document: &Value) -> Response {
    match serde_json::to_vec(document) {
        Ok(bytes) => with_cors(StatusCode::OK, Some(JSON_CONTENT_TYPE), Body::from(bytes)),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string(), Map::new()),
    }
}

/// `{ "error": error, ...extra }` with the given status.
pub fn error_response(status: StatusCode, error: &str, extra: Map<String, Value>) -> Response {
    let mut envelope = Map::with_capacity(extra.len() + 1);
    envelope.insert("error".to_string(), Value::String(error.to_string()));
    envelope.extend(extra);

    let body = serde_json::to_vec(&Value::Object(envelope)).unwrap_or_default();
    with_cors(status, Some(ERROR_CONTENT_TYPE), Body::from(body))
}

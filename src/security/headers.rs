//! Header policy for relayed and locally generated responses.
//!
//! # Responsibilities
//! - Attach the CORS header set to every response
//! - Drop framing and session headers from upstream responses
//! - Drop hop-by-hop headers from forwarded requests
//! - Normalize text content types to carry a charset
//!
//! # Design Decisions
//! - Upstream headers override CORS defaults of the same name
//! - Multi-valued upstream headers keep every value

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

/// CORS headers attached to every gateway response.
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, PUT, DELETE, OPTIONS"),
    ("access-control-allow-headers", "Content-Type, Authorization"),
    ("access-control-max-age", "86400"),
];

/// Upstream response headers never relayed to the client.
const EXCLUDED_RESPONSE_HEADERS: [&str; 7] = [
    "content-encoding",
    "content-length",
    "transfer-encoding",
    "connection",
    "keep-alive",
    "set-cookie",
    "set-cookie2",
];

/// Inbound request headers the upstream client must recompute itself.
const NON_FORWARDED_REQUEST_HEADERS: [&str; 10] = [
    "host",
    "content-length",
    "accept-encoding",
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
];

/// Build a fresh header map holding only the CORS headers.
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    apply_cors(&mut headers);
    headers
}

/// Insert the CORS headers, replacing existing values.
pub fn apply_cors(headers: &mut HeaderMap) {
    for (name, value) in CORS_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

pub fn is_excluded_response_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    EXCLUDED_RESPONSE_HEADERS.contains(&name.as_str())
}

pub fn should_forward_request_header(name: &HeaderName) -> bool {
    !NON_FORWARDED_REQUEST_HEADERS.contains(&name.as_str())
}

/// Copy the forwardable subset of inbound request headers.
pub fn forwarded_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound.iter() {
        if should_forward_request_header(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

/// CORS headers merged with the relayable upstream headers.
pub fn relay_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = cors_headers();
    for name in upstream.keys() {
        if is_excluded_response_header(name.as_str()) {
            continue;
        }
        headers.remove(name);
        for value in upstream.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    if let Some(normalized) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(normalize_content_type)
    {
        if let Ok(value) = HeaderValue::from_str(&normalized) {
            headers.insert(header::CONTENT_TYPE, value);
        }
    }

    headers
}

/// True for text, JSON, XML and JavaScript media types.
pub fn is_text_like(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/")
        || mime.ends_with("/json")
        || mime.ends_with("+json")
        || mime.ends_with("/xml")
        || mime.ends_with("+xml")
        || mime.ends_with("/javascript")
        || mime.ends_with("/x-javascript")
}

/// Returns the content type with `charset=utf-8` appended when it is
/// text-like and carries no charset; `None` when no change is needed.
pub fn normalize_content_type(content_type: &str) -> Option<String> {
    if !is_text_like(content_type) {
        return None;
    }
    if content_type.to_ascii_lowercase().contains("charset=") {
        return None;
    }
    Some(format!("{}; charset=utf-8", content_type.trim().trim_end_matches(';')))
}

//! Short identifiers derived from upstream API hostnames.
//!
//! Aggregator hosts such as `caiji.foo.com` encode the real source name one
//! label deeper, so the second-to-last label is used for them. Other hosts
//! use their first label with common API suffixes removed.

use sha2::{Digest, Sha256};
use url::Url;

const AGGREGATOR_PREFIXES: [&str; 4] = ["caiji", "api", "cj", "www"];

/// Stripped in this order, each at most once.
const NAME_SUFFIXES: [&str; 3] = ["zyapi", "zy", "api"];

const FALLBACK_ID: &str = "source";

/// Map an upstream API URL to a short lowercase identifier. Never fails.
pub fn derive_id(api_url: &str) -> String {
    match Url::parse(api_url) {
        Ok(url) => from_host(url.host_str().unwrap_or("")),
        Err(_) => fallback_id(api_url),
    }
}

fn from_host(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();

    let id = if labels.len() >= 3 && AGGREGATOR_PREFIXES.contains(&labels[0]) {
        alphanumeric(&labels[labels.len() - 2].to_ascii_lowercase())
    } else {
        let mut name = labels[0].to_ascii_lowercase();
        for suffix in NAME_SUFFIXES {
            if let Some(stripped) = name.strip_suffix(suffix) {
                name = stripped.to_string();
            }
        }
        alphanumeric(&name)
    };

    if id.is_empty() {
        FALLBACK_ID.to_string()
    } else {
        id
    }
}

fn alphanumeric(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// `source` plus six hex characters of the input's SHA-256, so the same
/// malformed input always maps to the same id.
fn fallback_id(input: &str) -> String {
    let digest = hex::encode(Sha256::digest(input.as_bytes()));
    format!("{}{}", FALLBACK_ID, &digest[..6])
}

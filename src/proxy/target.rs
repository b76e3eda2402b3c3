//! Proxy target validation and construction.

use std::fmt;

use url::Url;

use crate::error::GatewayError;
use crate::routing::QueryParams;

/// Absolute http(s) URL the relay will call, with the inbound query
/// parameters (other than `url`) appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    url: Url,
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

fn has_http_scheme(value: &str) -> bool {
    starts_with_ignore_case(value, "http://") || starts_with_ignore_case(value, "https://")
}

fn check_loop(target: &str, gateway_origin: &str) -> Result<(), GatewayError> {
    if !gateway_origin.is_empty() && starts_with_ignore_case(target, gateway_origin) {
        return Err(GatewayError::LoopDetected);
    }
    Ok(())
}

impl ProxyTarget {
    /// Reject non-http(s) targets and targets pointing at the gateway.
    /// Performs no I/O.
    pub fn validate(target_param: &str, gateway_origin: &str) -> Result<(), GatewayError> {
        if !has_http_scheme(target_param) {
            return Err(GatewayError::InvalidTarget);
        }
        check_loop(target_param, gateway_origin)
    }

    /// Build the target from the raw `url` value so nested percent-encoded
    /// characters survive exactly one decode.
    pub fn resolve(
        target_param: &str,
        gateway_origin: &str,
        query: &QueryParams,
    ) -> Result<Self, GatewayError> {
        let decoded = query
            .raw_value("url")
            .and_then(|raw| urlencoding::decode(raw).ok())
            .map(|s| s.into_owned())
            .unwrap_or_else(|| target_param.to_string());

        Self::validate(&decoded, gateway_origin)?;

        let mut url = Url::parse(&decoded)
            .map_err(|e| GatewayError::Upstream(format!("Invalid URL: {}", e)))?;

        let extras: Vec<(&str, &str)> = query.pairs().filter(|(k, _)| *k != "url").collect();
        if !extras.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in extras {
                pairs.append_pair(key, value);
            }
        }

        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for ProxyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

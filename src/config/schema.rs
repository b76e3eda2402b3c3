//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, public origin).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Config-document cache settings.
    pub cache: CacheConfig,

    /// Registry of remote config documents.
    pub sources: SourcesConfig,

    /// URL rewrite settings.
    pub rewrite: RewriteConfig,

    /// Proxy relay settings.
    pub proxy: ProxyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request limits.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Externally visible origin (e.g., "https://gw.example").
    /// When unset the origin is derived from the Host header.
    pub public_origin: Option<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            public_origin: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound for one upstream proxy attempt, in seconds.
    pub proxy_secs: u64,

    /// Whole-request deadline enforced by the middleware stack, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            proxy_secs: 9,
            request_secs: 30,
        }
    }
}

/// Cache configuration for fetched config documents.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Attach the in-process key-value store. When false every request
    /// fetches the source directly.
    pub enabled: bool,

    /// Prefix prepended to the source URL to form the store key.
    pub key_prefix: String,

    /// Entry lifetime in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key_prefix: "CACHE_".to_string(),
            ttl_secs: 600,
        }
    }
}

/// A registry entry. Both the flat `key = "url"` form and the detailed
/// `key = { name = "...", url = "..." }` form are accepted.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SourceEntry {
    Url(String),
    Detailed { name: String, url: String },
}

impl SourceEntry {
    pub fn url(&self) -> &str {
        match self {
            SourceEntry::Url(url) => url,
            SourceEntry::Detailed { url, .. } => url,
        }
    }

    /// Display name, falling back to the registry key for flat entries.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        match self {
            SourceEntry::Url(_) => key,
            SourceEntry::Detailed { name, .. } => name,
        }
    }
}

/// Remote config-document registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Entry used when `source` is missing or unknown.
    pub default_source: String,

    /// Named remote JSON documents.
    pub entries: BTreeMap<String, SourceEntry>,
}

const SOURCE_BASE: &str = "https://raw.githubusercontent.com/puppet680/KVideo-config/refs/heads/main";

impl Default for SourcesConfig {
    fn default() -> Self {
        let detailed = |name: &str, file: &str| SourceEntry::Detailed {
            name: name.to_string(),
            url: format!("{}/{}", SOURCE_BASE, file),
        };

        let mut entries = BTreeMap::new();
        entries.insert("jin18".to_string(), detailed("Jin18", "jin18.json"));
        entries.insert("jingjian".to_string(), detailed("Jingjian", "jingjian.json"));
        entries.insert("full".to_string(), detailed("Full", "KVideo-config.json"));
        entries.insert("lite".to_string(), detailed("Lite (healthy, general)", "lite.json"));
        entries.insert("adult".to_string(), detailed("Ranked (all groups)", "adult.json"));

        Self {
            default_source: "full".to_string(),
            entries,
        }
    }
}

/// URL rewrite configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Object keys whose string values are upstream API URLs.
    pub url_fields: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            url_fields: vec!["api".to_string(), "baseUrl".to_string()],
        }
    }
}

/// Proxy relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Strip a leading byte-order mark and NUL characters from text bodies.
    pub clean_text_bodies: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            clean_text_bodies: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body forwarded upstream, in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

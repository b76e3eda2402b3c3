//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default source exists in the registry)
//! - Validate value ranges (timeouts > 0, TTL > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnknownDefaultSource(String),
    InvalidSourceUrl { key: String, url: String },
    ZeroTimeout(&'static str),
    ZeroCacheTtl,
    NoUrlFields,
    InvalidBindAddress(String),
    InvalidPublicOrigin(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownDefaultSource(key) => {
                write!(f, "default source '{}' is not in the registry", key)
            }
            ValidationError::InvalidSourceUrl { key, url } => {
                write!(f, "source '{}' has a non-http(s) url: {}", key, url)
            }
            ValidationError::ZeroTimeout(name) => write!(f, "timeouts.{} must be > 0", name),
            ValidationError::ZeroCacheTtl => write!(f, "cache.ttl_secs must be > 0"),
            ValidationError::NoUrlFields => write!(f, "rewrite.url_fields must not be empty"),
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address is not a socket address: {}", addr)
            }
            ValidationError::InvalidPublicOrigin(origin) => {
                write!(f, "listener.public_origin must start with http:// or https://: {}", origin)
            }
        }
    }
}

fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Check every semantic rule and collect all violations.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if let Some(origin) = &config.listener.public_origin {
        if !is_http_url(origin) {
            errors.push(ValidationError::InvalidPublicOrigin(origin.clone()));
        }
    }

    if config.timeouts.proxy_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("proxy_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::ZeroCacheTtl);
    }

    let sources = &config.sources;
    if !sources.entries.contains_key(&sources.default_source) {
        errors.push(ValidationError::UnknownDefaultSource(
            sources.default_source.clone(),
        ));
    }
    for (key, entry) in &sources.entries {
        if !is_http_url(entry.url()) {
            errors.push(ValidationError::InvalidSourceUrl {
                key: key.clone(),
                url: entry.url().to_string(),
            });
        }
    }

    if config.rewrite.url_fields.iter().all(|f| f.is_empty()) {
        errors.push(ValidationError::NoUrlFields);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SourceEntry;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = GatewayConfig::default();
        config.timeouts.proxy_secs = 0;
        config.cache.ttl_secs = 0;
        config.sources.default_source = "missing".into();
        config
            .sources
            .entries
            .insert("ftp".into(), SourceEntry::Url("ftp://cfg.example/a.json".into()));
        config.rewrite.url_fields.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroTimeout("proxy_secs")));
        assert!(errors.contains(&ValidationError::ZeroCacheTtl));
        assert!(errors.contains(&ValidationError::UnknownDefaultSource("missing".into())));
        assert!(errors.contains(&ValidationError::NoUrlFields));
    }

    #[test]
    fn test_rejects_bad_listener_settings() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-addr".into();
        config.listener.public_origin = Some("gw.example".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("not-an-addr".into()),
                ValidationError::InvalidPublicOrigin("gw.example".into()),
            ]
        );
    }
}

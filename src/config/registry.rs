//! Read-only registry of remote config documents.

use std::collections::BTreeMap;

use crate::config::schema::SourcesConfig;

/// A named remote JSON config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub key: String,
    pub display_name: String,
    pub remote_url: String,
}

/// Immutable source lookup, built once at startup.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: BTreeMap<String, ConfigSource>,
    default_key: String,
}

impl SourceRegistry {
    pub fn from_config(config: &SourcesConfig) -> Self {
        let sources = config
            .entries
            .iter()
            .map(|(key, entry)| {
                let source = ConfigSource {
                    key: key.clone(),
                    display_name: entry.display_name(key).to_string(),
                    remote_url: entry.url().to_string(),
                };
                (key.clone(), source)
            })
            .collect();

        Self {
            sources,
            default_key: config.default_source.clone(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigSource> {
        self.sources.get(key)
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn default_source(&self) -> Option<&ConfigSource> {
        self.sources.get(&self.default_key)
    }

    /// Look up `key`, falling back to the default source when the key is
    /// missing or unknown.
    pub fn resolve(&self, key: Option<&str>) -> Option<&ConfigSource> {
        key.and_then(|k| self.get(k))
            .or_else(|| self.default_source())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigSource> {
        self.sources.values()
    }
}

//! Config-document pipeline: registry lookup, cached fetch, optional rewrite.

use serde_json::Value;

use crate::cache::ConfigCache;
use crate::config::SourceRegistry;
use crate::error::GatewayError;
use crate::rewrite::RewriteEngine;

/// Requested output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Document as fetched.
    Raw,
    /// URL-bearing fields routed through the gateway.
    Proxied,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self, GatewayError> {
        match value {
            "0" | "raw" => Ok(OutputFormat::Raw),
            "1" | "proxy" => Ok(OutputFormat::Proxied),
            other => Err(GatewayError::UnknownFormat(other.to_string())),
        }
    }
}

pub struct ConfigPipeline {
    registry: SourceRegistry,
    cache: ConfigCache,
    engine: RewriteEngine,
}

impl ConfigPipeline {
    pub fn new(registry: SourceRegistry, cache: ConfigCache, engine: RewriteEngine) -> Self {
        Self {
            registry,
            cache,
            engine,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Fetch the selected source and shape it per `format`.
    ///
    /// An unknown or missing `source` selects the default source. An empty
    /// `prefix` falls back to `default_prefix`.
    pub async fn render(
        &self,
        format: &str,
        source: Option<&str>,
        prefix: Option<&str>,
        default_prefix: &str,
    ) -> Result<Value, GatewayError> {
        let format = OutputFormat::parse(format)?;

        let selected = self
            .registry
            .resolve(source)
            .ok_or_else(|| GatewayError::SourceFetch("No config source configured".to_string()))?;

        let document = self.cache.get_cached(&selected.remote_url).await?;

        tracing::debug!(source = %selected.key, format = ?format, "Serving config document");

        Ok(match format {
            OutputFormat::Raw => document,
            OutputFormat::Proxied => {
                let prefix = prefix.filter(|p| !p.is_empty()).unwrap_or(default_prefix);
                self.engine.rewrite(&document, prefix)
            }
        })
    }
}

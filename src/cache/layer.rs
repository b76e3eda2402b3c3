//! Read-through cache for config documents.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::cache::fetcher::{FetchError, SourceFetcher};
use crate::cache::store::KvStore;
use crate::config::CacheConfig;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Read-through cache keyed by source URL.
///
/// The store is optional. Without one, or while it fails, every call fetches
/// the source directly. A stored value that does not parse is deleted and
/// replaced by a fresh fetch.
pub struct ConfigCache {
    store: Option<Arc<dyn KvStore>>,
    fetcher: Arc<dyn SourceFetcher>,
    key_prefix: String,
    ttl: Duration,
}

impl ConfigCache {
    pub fn new(
        store: Option<Arc<dyn KvStore>>,
        fetcher: Arc<dyn SourceFetcher>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            key_prefix: config.key_prefix.clone(),
            ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    pub fn cache_key(&self, source_url: &str) -> String {
        format!("{}{}", self.key_prefix, source_url)
    }

    pub async fn get_cached(&self, source_url: &str) -> Result<Value, CacheError> {
        let Some(store) = &self.store else {
            metrics::record_cache_event("bypass");
            return Ok(self.fetcher.fetch_json(source_url).await?);
        };

        let key = self.cache_key(source_url);
        match store.get(&key).await {
            Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str::<Value>(&raw) {
                Ok(document) => {
                    tracing::debug!(key = %key, "Config cache hit");
                    metrics::record_cache_event("hit");
                    return Ok(document);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Corrupt cache entry, refetching");
                    metrics::record_cache_event("corrupt");
                    if let Err(e) = store.delete(&key).await {
                        tracing::warn!(key = %key, error = %e, "Failed to delete corrupt cache entry");
                    }
                }
            },
            Ok(_) => {
                tracing::debug!(key = %key, "Config cache miss");
                metrics::record_cache_event("miss");
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, fetching directly");
                metrics::record_cache_event("store_error");
            }
        }

        let document = self.fetcher.fetch_json(source_url).await?;

        match serde_json::to_string(&document) {
            Ok(serialized) => {
                if let Err(e) = store.put(&key, serialized, self.ttl).await {
                    tracing::warn!(key = %key, error = %e, "Cache write failed");
                }
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to serialize document for cache"),
        }

        Ok(document)
    }
}

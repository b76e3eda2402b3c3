//! Remote JSON fetch capability.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure fetching a remote config document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Fetch failed: {0}")]
    Status(u16),

    #[error("Fetch failed: {0}")]
    Transport(String),

    #[error("Invalid JSON from source: {0}")]
    Decode(String),
}

/// Fetches and decodes a JSON document.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// `SourceFetcher` over a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Config source returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

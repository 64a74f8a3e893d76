//! HTTP client for a remote instance of this service.
//!
//! Lets other Rust services fetch embeddings over the `POST /embed` contract
//! instead of loading the model themselves.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::error;

use crate::models::{EmbedRequest, EmbedResponse, ErrorResponse};
use crate::traits::EmbeddingClient;

/// Environment variable holding the full `/embed` URL.
pub const EMBEDDING_URL_VAR: &str = "SBERT_EMBEDDING_URL";

/// Embedding client that calls `POST /embed` on a running service.
#[derive(Debug, Clone)]
pub struct RemoteEmbeddingClient {
    client: Client,
    url: String,
    model_name: String,
}

impl RemoteEmbeddingClient {
    /// Create a client for the given `/embed` URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            model_name: "remote".to_string(),
        }
    }

    /// Create a client from `SBERT_EMBEDDING_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a client from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(EMBEDDING_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("{} is not defined", EMBEDDING_URL_VAR))?;
        Ok(Self::new(url))
    }

    /// Label reported by [`EmbeddingClient::model_name`].
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EmbeddingClient for RemoteEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            text: text.to_string(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Embedding service error: {}", e);
                anyhow!(e).context("Failed to generate embeddings")
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            return Err(anyhow!("Embedding service error ({}): {}", status, detail));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| anyhow!(e).context("Invalid response from embedding service"))?;

        if body.embedding.is_empty() {
            return Err(anyhow!("Invalid response from embedding service"));
        }

        Ok(body.embedding)
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn provider_name(&self) -> &str {
        "remote"
    }
}

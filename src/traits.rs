//! Core traits for embedding clients.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for clients that turn text into an embedding vector.
///
/// Implemented by the in-process ONNX model and by the HTTP client for a
/// remote instance of this service.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Output dimension, when known ahead of a call.
    fn dimension(&self) -> Option<usize>;

    /// Name of the model producing the embeddings.
    fn model_name(&self) -> &str;

    /// Get the provider name.
    fn provider_name(&self) -> &str;
}

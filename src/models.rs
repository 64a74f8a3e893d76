//! API models for request/response types.
//!
//! Defines the JSON request/response structures for the embeddings API.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Minimum number of characters, after trimming, a text needs to be embedded.
pub const MIN_TEXT_CHARS: usize = 5;

/// Request for embedding a single text via API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// The text to embed.
    pub text: String,
}

/// Whitespace for the length rule: Unicode `White_Space` plus the
/// information separators U+001C..U+001F.
pub fn is_strippable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Number of characters left once leading and trailing whitespace is removed.
pub fn trimmed_char_count(text: &str) -> usize {
    text.trim_matches(is_strippable).chars().count()
}

impl EmbedRequest {
    /// Reject texts that are empty or shorter than [`MIN_TEXT_CHARS`]
    /// characters once surrounding whitespace is removed.
    pub fn validate(&self) -> Result<(), ApiError> {
        if trimmed_char_count(&self.text) < MIN_TEXT_CHARS {
            return Err(ApiError::TextTooShort);
        }
        Ok(())
    }
}

/// Response for a single embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// The embedding vector.
    pub embedding: Vec<f32>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Model name.
    pub model: String,
    /// Backend serving the model ("local" or "remote").
    pub provider: String,
    /// Embedding dimension, if the backend knows it.
    pub dimension: Option<usize>,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub detail: String,
}

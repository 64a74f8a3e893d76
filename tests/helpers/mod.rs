//! Shared fixtures for the HTTP tests.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use std::sync::{Arc, Mutex};

use sbert_embeddings::{create_router, AppState, EmbeddingClient};

pub const FAKE_DIMENSION: usize = 16;

/// Deterministic stand-in for the ONNX model.
///
/// Folds the text bytes into a fixed-size vector and remembers every text it
/// was asked to embed.
#[derive(Default)]
pub struct FakeEmbeddingClient {
    pub seen: Mutex<Vec<String>>,
}

impl FakeEmbeddingClient {
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingClient for FakeEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.seen.lock().unwrap().push(text.to_string());

        let mut embedding = vec![0.0f32; FAKE_DIMENSION];
        for (i, byte) in text.bytes().enumerate() {
            embedding[i % FAKE_DIMENSION] += byte as f32 / 255.0;
        }
        Ok(embedding)
    }

    fn dimension(&self) -> Option<usize> {
        Some(FAKE_DIMENSION)
    }

    fn model_name(&self) -> &str {
        "fake-minilm"
    }

    fn provider_name(&self) -> &str {
        "fake"
    }
}

/// Client whose every call fails, for the 500 path.
pub struct FailingEmbeddingClient;

#[async_trait]
impl EmbeddingClient for FailingEmbeddingClient {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(anyhow!("session poisoned"))
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    fn model_name(&self) -> &str {
        "broken"
    }

    fn provider_name(&self) -> &str {
        "fake"
    }
}

pub fn app_with(client: Arc<dyn EmbeddingClient>) -> Router {
    create_router(Arc::new(AppState::new(client)))
}

pub fn json_post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn embed_request(text: &str) -> Request<Body> {
    json_post("/embed", serde_json::json!({ "text": text }).to_string())
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

//! HTTP handlers module.
//!
//! Provides the HTTP endpoints backed by a single shared embedding client.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::models::{EmbedRequest, EmbedResponse, HealthResponse};
use crate::traits::EmbeddingClient;

/// Application state shared across handlers.
///
/// The client is built once before the server starts and never replaced.
pub struct AppState {
    pub client: Arc<dyn EmbeddingClient>,
}

impl AppState {
    pub fn new(client: Arc<dyn EmbeddingClient>) -> Self {
        Self { client }
    }
}

/// Build the service router with its middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/embed", post(embed_single))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "sbert-embeddings".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.client.model_name().to_string(),
        provider: state.client.provider_name().to_string(),
        dimension: state.client.dimension(),
    })
}

/// Embed a single text.
///
/// The untrimmed text is passed to the model; trimming only decides whether
/// the text is long enough.
pub async fn embed_single(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    debug!("Embedding text of {} chars", request.text.chars().count());

    let embedding = state.client.embed(&request.text).await.map_err(|e| {
        error!("Embedding failed: {:#}", e);
        ApiError::Internal(e)
    })?;

    Ok(Json(EmbedResponse { embedding }))
}

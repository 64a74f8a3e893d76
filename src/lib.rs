//! SBERT Embeddings Service - Library Entry Point
//!
//! Serves sentence embeddings from a local multilingual ONNX model over
//! `POST /embed`, and ships a client for calling such a service.

pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use clients::{LocalEmbeddingClient, LocalModelConfig, RemoteEmbeddingClient};
pub use config::Config;
pub use error::ApiError;
pub use handlers::{create_router, AppState};
pub use traits::EmbeddingClient;

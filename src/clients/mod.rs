//! Embedding clients module.

pub mod local;
pub mod remote;

pub use local::{LocalEmbeddingClient, LocalModelConfig};
pub use remote::RemoteEmbeddingClient;

//! SBERT Embeddings Service - Main Entry Point
//!
//! Loads the multilingual sentence-embedding model once, then serves
//! `POST /embed` until shutdown.

use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sbert_embeddings::clients::LocalEmbeddingClient;
use sbert_embeddings::config::Config;
use sbert_embeddings::handlers::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "sbert_embeddings=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    info!("🚀 Starting SBERT Embeddings Service v{}", env!("CARGO_PKG_VERSION"));
    info!("📦 Model: {} ({}D)", config.model_name, config.model_dimension);
    info!("🔧 Port: {}", config.port);

    if let Err(e) = config.validate_model_files() {
        tracing::error!("❌ Model files missing: {}", e);
        tracing::error!("Export the model to ONNX and place the files at:");
        tracing::error!("  - Model: {}", config.model_path);
        tracing::error!("  - Tokenizer: {}", config.tokenizer_path);
        tracing::error!(
            "Source: https://huggingface.co/sentence-transformers/{}",
            config.model_name
        );
        return Err(anyhow::anyhow!(e));
    }

    // Loading happens before the listener is bound; any failure is fatal.
    let client = match LocalEmbeddingClient::new(config.to_local_model_config()) {
        Ok(client) => {
            info!("✅ Local embedding model initialized");
            Arc::new(client)
        }
        Err(e) => {
            tracing::error!("Failed to load embedding model: {:#}", e);
            return Err(e);
        }
    };

    let app = create_router(Arc::new(AppState::new(client)));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("✅ Embeddings Service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Embeddings Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

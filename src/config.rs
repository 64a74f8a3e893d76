//! Configuration module for the embedding service.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

use crate::clients::LocalModelConfig;

pub const DEFAULT_MODEL_NAME: &str = "paraphrase-multilingual-MiniLM-L12-v2";

/// Main service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model_name: String,
    pub model_path: String,
    pub tokenizer_path: String,
    pub model_dimension: usize,
    pub max_seq_length: usize,
    pub intra_threads: usize,
    pub normalize_embeddings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_path: format!("./models/{}/model.onnx", DEFAULT_MODEL_NAME),
            tokenizer_path: format!("./models/{}/tokenizer.json", DEFAULT_MODEL_NAME),
            model_dimension: 384,
            max_seq_length: 128,
            intra_threads: 4,
            normalize_embeddings: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparseable values fall back to [`Config::default`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            model_name: lookup("MODEL_NAME").unwrap_or(defaults.model_name),
            model_path: lookup("MODEL_PATH").unwrap_or(defaults.model_path),
            tokenizer_path: lookup("TOKENIZER_PATH").unwrap_or(defaults.tokenizer_path),
            model_dimension: parse_var(&lookup, "MODEL_DIMENSION")
                .unwrap_or(defaults.model_dimension),
            max_seq_length: parse_var(&lookup, "MAX_SEQ_LENGTH")
                .unwrap_or(defaults.max_seq_length),
            intra_threads: parse_var(&lookup, "INTRA_THREADS")
                .unwrap_or(defaults.intra_threads),
            normalize_embeddings: lookup("NORMALIZE_EMBEDDINGS")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.normalize_embeddings),
        }
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .parse::<IpAddr>()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(ip, self.port)
    }

    /// Check that the model and tokenizer files exist on disk.
    pub fn validate_model_files(&self) -> Result<(), String> {
        if !Path::new(&self.model_path).exists() {
            return Err(format!("Model file not found: {}", self.model_path));
        }
        if !Path::new(&self.tokenizer_path).exists() {
            return Err(format!("Tokenizer file not found: {}", self.tokenizer_path));
        }
        Ok(())
    }

    pub fn to_local_model_config(&self) -> LocalModelConfig {
        LocalModelConfig {
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            dimension: self.model_dimension,
            max_length: self.max_seq_length,
            model_name: self.model_name.clone(),
            intra_threads: self.intra_threads,
            normalize: self.normalize_embeddings,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Local embedding model client using ONNX Runtime.
//!
//! This module loads a sentence-transformer exported to ONNX together with its
//! HuggingFace tokenizer and runs it entirely on-device. The transformer output
//! is mean-pooled over the attention mask, which is what the
//! paraphrase-multilingual-MiniLM-L12-v2 pipeline does.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::config::DEFAULT_MODEL_NAME;
use crate::services::VectorOps;
use crate::traits::EmbeddingClient;

/// Sentence embedded once at load time to check the output dimension.
const WARMUP_TEXT: &str = "The quick brown fox jumps over the lazy dog.";

/// Configuration for the local embedding model.
#[derive(Debug, Clone)]
pub struct LocalModelConfig {
    /// Path to the ONNX model file.
    pub model_path: String,
    /// Path to the tokenizer.json file.
    pub tokenizer_path: String,
    /// Expected output embedding dimension.
    pub dimension: usize,
    /// Maximum sequence length in tokens, special tokens included.
    pub max_length: usize,
    /// Model name for identification.
    pub model_name: String,
    /// Threads used by ONNX Runtime inside one graph execution.
    pub intra_threads: usize,
    /// L2-normalise embeddings before returning them.
    pub normalize: bool,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            model_path: format!("./models/{}/model.onnx", DEFAULT_MODEL_NAME),
            tokenizer_path: format!("./models/{}/tokenizer.json", DEFAULT_MODEL_NAME),
            dimension: 384,
            max_length: 128,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            intra_threads: 4,
            normalize: false,
        }
    }
}

/// Local embedding client using ONNX Runtime for inference.
///
/// Cloning is cheap; clones share the same session and tokenizer.
#[derive(Clone)]
pub struct LocalEmbeddingClient {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    config: LocalModelConfig,
    // XLM-R exports usually omit this input, BERT exports require it.
    feeds_token_type_ids: bool,
}

impl std::fmt::Debug for LocalEmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEmbeddingClient")
            .field("config", &self.config)
            .field("feeds_token_type_ids", &self.feeds_token_type_ids)
            .finish_non_exhaustive()
    }
}

impl LocalEmbeddingClient {
    /// Load the model and tokenizer, then run a warm-up inference.
    ///
    /// Fails if either file is missing, the graph cannot be loaded, or the
    /// warm-up embedding does not have `config.dimension` components.
    pub fn new(config: LocalModelConfig) -> Result<Self> {
        info!("Initializing local embedding model: {}", config.model_name);

        if !Path::new(&config.model_path).exists() {
            bail!(
                "Model file not found: {}. Please download the model first.",
                config.model_path
            );
        }

        if !Path::new(&config.tokenizer_path).exists() {
            bail!(
                "Tokenizer file not found: {}. Please download the tokenizer first.",
                config.tokenizer_path
            );
        }

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.intra_threads)?
            .commit_from_file(&config.model_path)
            .context(format!("Failed to load ONNX model from {}", config.model_path))?;

        let feeds_token_type_ids = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");

        info!(
            "✓ ONNX session created for {} (token_type_ids: {})",
            config.model_name, feeds_token_type_ids
        );

        let mut tokenizer = Tokenizer::from_file(&config.tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Failed to configure tokenizer truncation: {}", e))?;
        tokenizer.with_padding(None);

        info!("✓ Tokenizer loaded (max length {})", config.max_length);

        let client = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            config,
            feeds_token_type_ids,
        };

        let warmup = client
            .run_inference(WARMUP_TEXT)
            .context("Warm-up inference failed")?;
        if warmup.len() != client.config.dimension {
            bail!(
                "Model outputs {} dimensions (expected {})",
                warmup.len(),
                client.config.dimension
            );
        }

        Ok(client)
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(LocalModelConfig::default())
    }

    /// Tokenize text into input ids and attention mask.
    fn encode_text(&self, text: &str) -> Result<(Vec<i64>, Vec<i64>)> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        Ok((input_ids, attention_mask))
    }

    /// Run inference on a single text. Blocks the calling thread.
    fn run_inference(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) = self.encode_text(text)?;
        let seq_len = input_ids.len();
        if seq_len == 0 {
            bail!("Tokenizer produced no tokens");
        }

        let input_ids_tensor =
            Tensor::from_array(([1usize, seq_len], input_ids.into_boxed_slice()))?;
        let attention_mask_tensor =
            Tensor::from_array(([1usize, seq_len], attention_mask.clone().into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Failed to lock session: {}", e))?;

        let outputs = if self.feeds_token_type_ids {
            let token_type_ids_tensor =
                Tensor::from_array(([1usize, seq_len], vec![0i64; seq_len].into_boxed_slice()))?;
            session.run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor
            ])?
        };

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract output tensor")?;
        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();

        let mut embedding = pool_output(&dims, data, &attention_mask)?;
        if self.config.normalize {
            VectorOps::normalize_inplace(&mut embedding);
        }

        Ok(embedding)
    }
}

/// Reduce the first graph output to one sentence vector.
///
/// `[1, seq_len, hidden]` is mean-pooled over tokens weighted by the attention
/// mask; `[1, hidden]` is taken as already pooled.
pub(crate) fn pool_output(shape: &[usize], data: &[f32], attention_mask: &[i64]) -> Result<Vec<f32>> {
    match *shape {
        [1, seq_len, hidden] => {
            if hidden == 0 || data.len() != seq_len * hidden {
                bail!(
                    "Output tensor holds {} values, shape {:?}",
                    data.len(),
                    shape
                );
            }
            if attention_mask.len() != seq_len {
                bail!(
                    "Attention mask length {} does not match sequence length {}",
                    attention_mask.len(),
                    seq_len
                );
            }

            let mut pooled = vec![0.0f32; hidden];
            let mut mask_sum = 0.0f32;
            for (token, &mask) in data.chunks_exact(hidden).zip(attention_mask) {
                if mask == 0 {
                    continue;
                }
                let weight = mask as f32;
                mask_sum += weight;
                for (acc, &value) in pooled.iter_mut().zip(token) {
                    *acc += value * weight;
                }
            }

            let denom = mask_sum.max(1e-9);
            pooled.iter_mut().for_each(|x| *x /= denom);
            Ok(pooled)
        }
        [1, hidden] => {
            if data.len() != hidden {
                bail!(
                    "Output tensor holds {} values, shape {:?}",
                    data.len(),
                    shape
                );
            }
            Ok(data.to_vec())
        }
        _ => bail!("Unexpected output tensor shape: {:?}", shape),
    }
}

#[async_trait]
impl EmbeddingClient for LocalEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let client = self.clone();
        let text = text.to_string();

        let embedding = tokio::task::spawn_blocking(move || client.run_inference(&text))
            .await
            .map_err(|e| anyhow!("Embedding task failed: {}", e))??;

        debug!("Generated {}-dimensional embedding", embedding.len());
        Ok(embedding)
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.config.dimension)
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }

    fn provider_name(&self) -> &str {
        "local"
    }
}

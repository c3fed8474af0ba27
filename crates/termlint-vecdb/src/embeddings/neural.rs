//! # Transformer Embedder
//!
//! Runs a BERT-family sentence encoder with candle on the CPU. Token
//! states are mean-pooled under the attention mask and L2-normalized, the
//! same pooling used by sentence-transformers checkpoints.

use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::Embedder;
use crate::error::{Result, VecDbError};

/// Longest token sequence fed to the encoder.
pub const MAX_SEQUENCE_LENGTH: usize = 256;

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Sentence encoder backed by a BERT model.
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dimension: usize,
    model_dir: PathBuf,
}

impl BertEmbedder {
    /// Loads `config.json`, `tokenizer.json` and `model.safetensors` from
    /// `model_dir`.
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let device = Device::Cpu;

        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        if !tokenizer_path.exists() {
            return Err(VecDbError::ModelLoad(format!(
                "tokenizer not found at {}",
                tokenizer_path.display()
            )));
        }
        let weights_path = model_dir.join(WEIGHTS_FILE);
        if !weights_path.exists() {
            return Err(VecDbError::ModelLoad(format!(
                "model weights not found at {}",
                weights_path.display()
            )));
        }

        let config_path = model_dir.join(CONFIG_FILE);
        let config_str = std::fs::read_to_string(&config_path).map_err(|e| {
            VecDbError::ModelLoad(format!("failed to read {}: {e}", config_path.display()))
        })?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| VecDbError::ModelLoad(format!("failed to parse config: {e}")))?;
        let hidden_size = config.hidden_size;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| VecDbError::Tokenizer(e.to_string()))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| VecDbError::Tokenizer(e.to_string()))?;

        // SAFETY: the weights file is opened read-only and not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device) }?;
        let model = BertModel::load(vb, &config)?;

        info!(
            model_dir = %model_dir.display(),
            dimension = hidden_size,
            "loaded sentence embedding model"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            dimension: hidden_size,
            model_dir: model_dir.to_path_buf(),
        })
    }

    /// Directory the model was loaded from.
    #[must_use]
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
}

impl Embedder for BertEmbedder {
    fn name(&self) -> &str {
        "bert"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| VecDbError::Tokenizer(e.to_string()))?;

        let ids = encodings
            .iter()
            .map(|e| Tensor::new(e.get_ids(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let masks = encodings
            .iter()
            .map(|e| Tensor::new(e.get_attention_mask(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        let input_ids = Tensor::stack(&ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = normalize_rows(&mean_pool(&hidden, &attention_mask)?)?;

        debug!(batch = texts.len(), "embedded batch");
        Ok(pooled.to_vec2::<f32>()?)
    }
}

/// Averages `[batch, seq, hidden]` token states over unmasked positions.
pub fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
    let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.clamp(1e-9f32, f32::MAX)?;
    summed.broadcast_div(&counts)
}

/// Scales each row of a `[batch, hidden]` tensor to unit length.
pub fn normalize_rows(t: &Tensor) -> candle_core::Result<Tensor> {
    let norms = t.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12f32, f32::MAX)?;
    t.broadcast_div(&norms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_pool_ignores_padding() {
        let device = Device::Cpu;
        // batch of 1, 3 tokens, hidden 2; last token is padding
        let hidden = Tensor::new(&[[[1.0f32, 2.0], [3.0, 4.0], [100.0, 100.0]]], &device).unwrap();
        let mask = Tensor::new(&[[1u32, 1, 0]], &device).unwrap();

        let pooled = mean_pool(&hidden, &mask).unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(pooled, vec![vec![2.0, 3.0]]);
    }

    #[test]
    fn rows_normalized() {
        let device = Device::Cpu;
        let t = Tensor::new(&[[3.0f32, 4.0], [0.0, 2.0]], &device).unwrap();
        let rows = normalize_rows(&t).unwrap().to_vec2::<f32>().unwrap();

        assert!((rows[0][0] - 0.6).abs() < 1e-6);
        assert!((rows[0][1] - 0.8).abs() < 1e-6);
        assert_eq!(rows[1], vec![0.0, 1.0]);
    }

    #[test]
    fn missing_model_dir_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BertEmbedder::load(dir.path()).err().unwrap();
        assert!(matches!(err, VecDbError::ModelLoad(_)));
        assert!(err.to_string().contains("tokenizer.json"));
    }
}

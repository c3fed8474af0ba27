//! # Sentence Embedders
//!
//! An [`Embedder`] turns text into fixed-width vectors whose dot product is
//! their cosine similarity. Two implementations are provided: a BERT-style
//! transformer run through candle, and a character-trigram hashing model
//! with no model files.

pub mod lexical;
pub mod neural;

use std::path::PathBuf;

use crate::error::{Result, VecDbError};

pub use lexical::LexicalEmbedder;
pub use neural::BertEmbedder;

/// Maps sentences to unit-length vectors.
pub trait Embedder: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Width of every vector this embedder produces.
    fn dimension(&self) -> usize;

    /// Embeds a batch of texts, one L2-normalized vector per input, in
    /// input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embeds a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| VecDbError::Candle("embedder returned no vector".into()))
    }
}

/// Which embedder backs the semantic stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticBackend {
    /// Transformer model loaded from a directory holding `config.json`,
    /// `tokenizer.json` and `model.safetensors`.
    Neural {
        /// Model directory.
        model_dir: PathBuf,
    },
    /// Character-trigram hashing. Needs no model files.
    Lexical,
}

impl SemanticBackend {
    /// Instantiates the embedder.
    ///
    /// # Errors
    ///
    /// Returns `VecDbError::ModelLoad` (or a tokenizer/candle error) when the
    /// neural model cannot be loaded.
    pub fn load(&self) -> Result<Box<dyn Embedder>> {
        match self {
            Self::Neural { model_dir } => Ok(Box::new(BertEmbedder::load(model_dir)?)),
            Self::Lexical => Ok(Box::new(LexicalEmbedder::new())),
        }
    }
}

/// Scales `vector` to unit length in place. Zero vectors are left as-is.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
}

/// Dot product of two equal-width vectors.
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

//! Character-trigram hashing embedder.
//!
//! Each word is lower-cased, padded with one space on both sides and cut
//! into overlapping character trigrams. Trigrams are hashed into a fixed
//! number of buckets, and the resulting count vector is L2-normalized.
//! Sentences that share many word fragments score high. Word order and
//! meaning are ignored.

use xxhash_rust::xxh3::xxh3_64;

use super::{Embedder, l2_normalize};
use crate::error::Result;

/// Bag-of-trigrams embedder with a fixed bucket count.
#[derive(Debug, Clone)]
pub struct LexicalEmbedder {
    dimension: usize,
}

impl LexicalEmbedder {
    /// Bucket count used by [`LexicalEmbedder::new`].
    pub const DEFAULT_DIMENSION: usize = 2048;

    #[must_use]
    pub fn new() -> Self {
        Self::with_dimension(Self::DEFAULT_DIMENSION)
    }

    /// Uses `dimension` buckets (at least 1).
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        for word in lowered.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            let padded: Vec<char> = std::iter::once(' ')
                .chain(word.chars())
                .chain(std::iter::once(' '))
                .collect();

            let mut trigram = String::with_capacity(12);
            for window in padded.windows(3) {
                trigram.clear();
                trigram.extend(window);
                let bucket = xxh3_64(trigram.as_bytes()) % self.dimension as u64;
                vector[bucket as usize] += 1.0;
            }
        }

        l2_normalize(&mut vector);
        vector
    }
}

impl Default for LexicalEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for LexicalEmbedder {
    fn name(&self) -> &str {
        "lexical"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.vectorize(text)).collect())
    }
}

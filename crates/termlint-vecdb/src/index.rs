//! # Similarity Index
//!
//! Exhaustive cosine search over an [`EmbeddingCorpus`]. Corpus vectors
//! are unit length, so similarity is a plain dot product.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::corpus::{CorpusRecord, EmbeddingCorpus, load_corpus_records};
use crate::embeddings::{Embedder, dot, l2_normalize};
use crate::error::{Result, VecDbError};

/// A corpus row that scored against a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityHit<'a> {
    /// Position of the row in the corpus.
    pub index: usize,
    pub record: &'a CorpusRecord,
    /// Cosine similarity in `[-1.0, 1.0]`.
    pub score: f32,
}

/// Embedded corpus plus the embedder used to encode queries against it.
pub struct SimilarityIndex {
    corpus: EmbeddingCorpus,
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for SimilarityIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityIndex")
            .field("rows", &self.corpus.len())
            .field("dimension", &self.corpus.dimension())
            .field("embedder", &self.embedder.name())
            .finish()
    }
}

impl SimilarityIndex {
    /// Pairs an already embedded corpus with its query embedder.
    ///
    /// # Errors
    ///
    /// `VecDbError::DimensionMismatch` if the embedder's width differs from
    /// the corpus vectors.
    pub fn new(corpus: EmbeddingCorpus, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if corpus.dimension() != embedder.dimension() {
            return Err(VecDbError::DimensionMismatch {
                expected: corpus.dimension(),
                actual: embedder.dimension(),
            });
        }
        Ok(Self { corpus, embedder })
    }

    /// Embeds `records` and builds the index.
    pub fn build(records: Vec<CorpusRecord>, embedder: Box<dyn Embedder>) -> Result<Self> {
        Self::build_shared(records, Arc::from(embedder))
    }

    /// Like [`SimilarityIndex::build`], with an embedder shared by other
    /// indexes.
    pub fn build_shared(records: Vec<CorpusRecord>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let corpus = EmbeddingCorpus::build(records, embedder.as_ref())?;
        Ok(Self { corpus, embedder })
    }

    /// Loads the corpus CSV at `path` and builds the index.
    pub fn load(path: impl AsRef<Path>, embedder: Box<dyn Embedder>) -> Result<Self> {
        Self::load_shared(path, Arc::from(embedder))
    }

    /// Like [`SimilarityIndex::load`], with a shared embedder.
    pub fn load_shared(path: impl AsRef<Path>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        Self::build_shared(load_corpus_records(path)?, embedder)
    }

    #[must_use]
    pub fn corpus(&self) -> &EmbeddingCorpus {
        &self.corpus
    }

    #[must_use]
    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Top `topn` rows for `query`, best first, keeping only those scoring at
    /// least `threshold`.
    pub fn search(&self, query: &str, topn: usize, threshold: f32) -> Result<Vec<SimilarityHit<'_>>> {
        let vector = self.embed_query(query)?;
        Ok(self.search_vector(&vector, topn, threshold))
    }

    /// Runs [`SimilarityIndex::search`] for every query with one batched
    /// embedder call.
    pub fn search_batch(
        &self,
        queries: &[&str],
        topn: usize,
        threshold: f32,
    ) -> Result<Vec<Vec<SimilarityHit<'_>>>> {
        let vectors = self.embedder.embed_batch(queries)?;
        vectors
            .into_iter()
            .map(|mut vector| {
                self.check_width(&vector)?;
                l2_normalize(&mut vector);
                Ok(self.search_vector(&vector, topn, threshold))
            })
            .collect()
    }

    /// Ranks corpus rows against a unit-length query vector.
    ///
    /// The `topn` best rows are taken first and then filtered by
    /// `threshold`, so fewer than `topn` hits may come back. Rows with equal
    /// scores keep corpus order.
    #[must_use]
    pub fn search_vector(&self, query: &[f32], topn: usize, threshold: f32) -> Vec<SimilarityHit<'_>> {
        let mut scored: Vec<(usize, f32)> = self
            .corpus
            .vectors()
            .map(|row| dot(row, query))
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let hits: Vec<_> = scored
            .into_iter()
            .take(topn)
            .filter(|(_, score)| *score >= threshold)
            .filter_map(|(index, score)| {
                self.corpus.record(index).map(|record| SimilarityHit {
                    index,
                    record,
                    score,
                })
            })
            .collect();
        debug!(hits = hits.len(), topn, threshold, "similarity search");
        hits
    }

    fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let mut vector = self.embedder.embed(query)?;
        self.check_width(&vector)?;
        l2_normalize(&mut vector);
        Ok(vector)
    }

    fn check_width(&self, vector: &[f32]) -> Result<()> {
        if vector.len() == self.corpus.dimension() {
            Ok(())
        } else {
            Err(VecDbError::DimensionMismatch {
                expected: self.corpus.dimension(),
                actual: vector.len(),
            })
        }
    }
}

//! # Index Cache
//!
//! Loading a model and embedding a corpus are both expensive. Embedders
//! are kept per backend, so a model is loaded once no matter how many
//! corpora use it, and built indexes are kept per (corpus path, backend).
//! Both are shared through `Arc`. Failed loads are not cached.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::embeddings::{Embedder, SemanticBackend};
use crate::error::Result;
use crate::index::SimilarityIndex;

/// Identity of a built index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub corpus: PathBuf,
    pub backend: SemanticBackend,
}

impl CacheKey {
    pub fn new(corpus: impl Into<PathBuf>, backend: SemanticBackend) -> Self {
        Self {
            corpus: corpus.into(),
            backend,
        }
    }
}

/// Lazily loaded embedders and similarity indexes.
#[derive(Default)]
pub struct IndexCache {
    embedders: HashMap<SemanticBackend, Arc<dyn Embedder>>,
    indexes: HashMap<CacheKey, Arc<SimilarityIndex>>,
}

impl std::fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("embedders", &self.embedders.keys().collect::<Vec<_>>())
            .field("indexes", &self.indexes)
            .finish()
    }
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for `corpus` under `backend`, loading the embedder
    /// and embedding the corpus on first use.
    pub fn get_or_load(
        &mut self,
        corpus: &Path,
        backend: &SemanticBackend,
    ) -> Result<Arc<SimilarityIndex>> {
        let key = CacheKey::new(corpus, backend.clone());
        if let Some(index) = self.indexes.get(&key) {
            debug!(corpus = %corpus.display(), "similarity index cache hit");
            return Ok(Arc::clone(index));
        }
        let embedder = self.embedder(backend)?;
        self.get_or_build_with(key, || SimilarityIndex::load_shared(corpus, embedder))
    }

    /// Returns the embedder for `backend`, loading it on first use.
    pub fn embedder(&mut self, backend: &SemanticBackend) -> Result<Arc<dyn Embedder>> {
        if let Some(embedder) = self.embedders.get(backend) {
            return Ok(Arc::clone(embedder));
        }
        let embedder: Arc<dyn Embedder> = Arc::from(backend.load()?);
        info!(embedder = embedder.name(), "loaded embedder");
        self.embedders.insert(backend.clone(), Arc::clone(&embedder));
        Ok(embedder)
    }

    /// Returns the cached index for `key`, or stores the one `build` returns.
    pub fn get_or_build_with<F>(&mut self, key: CacheKey, build: F) -> Result<Arc<SimilarityIndex>>
    where
        F: FnOnce() -> Result<SimilarityIndex>,
    {
        if let Some(index) = self.indexes.get(&key) {
            debug!(corpus = %key.corpus.display(), "similarity index cache hit");
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(build()?);
        info!(
            corpus = %key.corpus.display(),
            rows = index.corpus().len(),
            "cached similarity index"
        );
        self.indexes.insert(key, Arc::clone(&index));
        Ok(index)
    }

    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.indexes.contains_key(key)
    }

    /// Number of loaded embedders.
    #[must_use]
    pub fn embedder_count(&self) -> usize {
        self.embedders.len()
    }

    /// Number of built indexes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Drops every cached index and embedder.
    pub fn clear(&mut self) {
        self.indexes.clear();
        self.embedders.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VecDbError;

    fn corpus_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("corpus.csv");
        std::fs::write(
            &path,
            "wrong_usage,approved_term,comment\nособовий склад загинув,втрати,\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn second_lookup_reuses_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = corpus_file(&dir);
        let mut cache = IndexCache::new();

        let first = cache.get_or_load(&path, &SemanticBackend::Lexical).unwrap();
        let second = cache.get_or_load(&path, &SemanticBackend::Lexical).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&CacheKey::new(&path, SemanticBackend::Lexical)));
    }

    #[test]
    fn embedder_shared_across_corpora() {
        let dir = tempfile::tempdir().unwrap();
        let first_path = corpus_file(&dir);
        let second_path = dir.path().join("other.csv");
        std::fs::write(&second_path, "wrong_usage,approved_term
бронетехніка знищена,танк
")
            .unwrap();
        let mut cache = IndexCache::new();

        let first = cache.get_or_load(&first_path, &SemanticBackend::Lexical).unwrap();
        let second = cache.get_or_load(&second_path, &SemanticBackend::Lexical).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.embedder_count(), 1);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(std::ptr::addr_eq(first.embedder(), second.embedder()));
    }

    #[test]
    fn failed_model_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = corpus_file(&dir);
        let backend = SemanticBackend::Neural {
            model_dir: dir.path().join("no-model"),
        };
        let mut cache = IndexCache::new();

        assert!(matches!(
            cache.get_or_load(&path, &backend),
            Err(VecDbError::ModelLoad(_))
        ));
        assert_eq!(cache.embedder_count(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn failed_build_is_not_cached() {
        let mut cache = IndexCache::new();
        let key = CacheKey::new("corpus.csv", SemanticBackend::Lexical);

        let err = cache
            .get_or_build_with(key.clone(), || Err(VecDbError::EmptyCorpus))
            .unwrap_err();
        assert!(matches!(err, VecDbError::EmptyCorpus));
        assert!(cache.is_empty());
        assert!(!cache.contains(&key));
    }

    #[test]
    fn missing_corpus_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = IndexCache::new();
        let err = cache
            .get_or_load(&dir.path().join("absent.csv"), &SemanticBackend::Lexical)
            .unwrap_err();
        assert!(matches!(err, VecDbError::Io(_)));
    }

    #[test]
    fn clear_drops_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let path = corpus_file(&dir);
        let mut cache = IndexCache::new();
        cache.get_or_load(&path, &SemanticBackend::Lexical).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.embedder_count(), 0);
    }
}

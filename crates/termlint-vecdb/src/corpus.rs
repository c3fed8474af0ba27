//! # Embedding Corpus
//!
//! Known incorrect sentences, each paired with the approved term it
//! should have used and an optional comment. Loaded from CSV:
//!
//! ```text
//! wrong_usage,approved_term,comment
//! особовий склад загинув,втрати,Вживати «втрати особового складу»
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::embeddings::{Embedder, l2_normalize};
use crate::error::{Result, VecDbError};

/// Columns without which the corpus cannot be loaded. `comment` is optional.
pub const REQUIRED_CORPUS_COLUMNS: [&str; 2] = ["wrong_usage", "approved_term"];

/// Texts embedded per encoder call when building the corpus.
pub const EMBED_BATCH_SIZE: usize = 32;

/// One corpus row before embedding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub wrong_usage: String,
    pub approved_term: String,
    pub comment: String,
}

impl CorpusRecord {
    pub fn new(wrong_usage: impl Into<String>, approved_term: impl Into<String>) -> Self {
        Self {
            wrong_usage: wrong_usage.into(),
            approved_term: approved_term.into(),
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Reads corpus rows from a CSV file.
pub fn load_corpus_records(path: impl AsRef<Path>) -> Result<Vec<CorpusRecord>> {
    let path = path.as_ref();
    let records = read_corpus_records(File::open(path)?)?;
    info!(path = %path.display(), rows = records.len(), "loaded embedding corpus");
    Ok(records)
}

/// Reads corpus rows from any CSV byte source. Rows with an empty
/// `wrong_usage` are skipped.
pub fn read_corpus_records<R: Read>(reader: R) -> Result<Vec<CorpusRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
    };

    let missing: Vec<String> = REQUIRED_CORPUS_COLUMNS
        .iter()
        .filter(|name| column(name).is_none())
        .map(|name| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(VecDbError::MissingColumns { columns: missing });
    }

    let (wrong, approved, comment) = (
        column("wrong_usage"),
        column("approved_term"),
        column("comment"),
    );

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        let field = |col: Option<usize>| col.and_then(|c| row.get(c)).unwrap_or("").trim();

        let wrong_usage = field(wrong);
        if wrong_usage.is_empty() {
            warn!(row = idx + 2, "skipping corpus row with empty wrong_usage");
            continue;
        }
        records.push(CorpusRecord {
            wrong_usage: wrong_usage.to_string(),
            approved_term: field(approved).to_string(),
            comment: field(comment).to_string(),
        });
    }
    Ok(records)
}

/// Corpus rows together with one unit-length vector per row.
#[derive(Debug, Clone)]
pub struct EmbeddingCorpus {
    records: Vec<CorpusRecord>,
    vectors: Vec<f32>,
    dimension: usize,
}

impl EmbeddingCorpus {
    /// Embeds every record's `wrong_usage` with `embedder`.
    ///
    /// # Errors
    ///
    /// `VecDbError::EmptyCorpus` if `records` is empty, or whatever the
    /// embedder raises.
    pub fn build(records: Vec<CorpusRecord>, embedder: &dyn Embedder) -> Result<Self> {
        if records.is_empty() {
            return Err(VecDbError::EmptyCorpus);
        }

        let dimension = embedder.dimension();
        if dimension == 0 {
            return Err(VecDbError::ModelLoad(format!(
                "embedder {} reports zero dimensions",
                embedder.name()
            )));
        }
        let mut vectors = Vec::with_capacity(records.len() * dimension);

        for chunk in records.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = chunk.iter().map(|r| r.wrong_usage.as_str()).collect();
            for mut vector in embedder.embed_batch(&texts)? {
                if vector.len() != dimension {
                    return Err(VecDbError::DimensionMismatch {
                        expected: dimension,
                        actual: vector.len(),
                    });
                }
                l2_normalize(&mut vector);
                vectors.extend_from_slice(&vector);
            }
            debug!(rows = chunk.len(), embedder = embedder.name(), "embedded corpus batch");
        }

        info!(
            rows = records.len(),
            dimension,
            embedder = embedder.name(),
            "built embedding corpus"
        );
        Ok(Self {
            records,
            vectors,
            dimension,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn records(&self) -> &[CorpusRecord] {
        &self.records
    }

    /// Row `index`, if present.
    #[must_use]
    pub fn record(&self, index: usize) -> Option<&CorpusRecord> {
        self.records.get(index)
    }

    /// Unit vector of row `index`.
    #[must_use]
    pub fn vector(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dimension)?;
        self.vectors.get(start..start + self.dimension)
    }

    /// All row vectors in corpus order.
    pub fn vectors(&self) -> std::slice::ChunksExact<'_, f32> {
        self.vectors.chunks_exact(self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::LexicalEmbedder;

    #[test]
    fn load_with_comment_column() {
        let csv = "wrong_usage,approved_term,comment\n\
                   особовий склад загинув,втрати, див. наказ \n";
        let records = read_corpus_records(csv.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![CorpusRecord::new("особовий склад загинув", "втрати").with_comment("див. наказ")]
        );
    }

    #[test]
    fn comment_column_is_optional() {
        let csv = "\u{feff}approved_term,wrong_usage\nвтрати,особовий склад загинув\n";
        let records = read_corpus_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].approved_term, "втрати");
        assert_eq!(records[0].comment, "");
    }

    #[test]
    fn missing_required_columns() {
        let err = read_corpus_records("sentence,comment\nx,y\n".as_bytes()).unwrap_err();
        match err {
            VecDbError::MissingColumns { columns } => {
                assert_eq!(columns, vec!["wrong_usage", "approved_term"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_wrong_usage_rows_skipped() {
        let csv = "wrong_usage,approved_term\n,втрати\nзагинув,втрати\n";
        assert_eq!(read_corpus_records(csv.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn build_rejects_empty_corpus() {
        let err = EmbeddingCorpus::build(Vec::new(), &LexicalEmbedder::new()).unwrap_err();
        assert!(matches!(err, VecDbError::EmptyCorpus));
    }

    #[test]
    fn build_keeps_rows_and_vectors_aligned() {
        let records: Vec<_> = (0..EMBED_BATCH_SIZE + 3)
            .map(|i| CorpusRecord::new(format!("речення номер {i}"), "термін"))
            .collect();
        let embedder = LexicalEmbedder::with_dimension(128);
        let corpus = EmbeddingCorpus::build(records, &embedder).unwrap();

        assert_eq!(corpus.len(), EMBED_BATCH_SIZE + 3);
        assert_eq!(corpus.vectors().count(), corpus.len());
        assert_eq!(corpus.dimension(), 128);
        let expected = embedder.embed("речення номер 7").unwrap();
        assert!((crate::embeddings::dot(corpus.vector(7).unwrap(), &expected) - 1.0).abs() < 1e-5);
        assert!(corpus.vector(corpus.len()).is_none());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        std::fs::write(&path, "wrong_usage,approved_term\nзагинув,втрати\n").unwrap();
        assert_eq!(load_corpus_records(&path).unwrap().len(), 1);
    }
}

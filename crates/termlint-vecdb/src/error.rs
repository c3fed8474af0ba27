use thiserror::Error;

/// Errors raised while building or querying the semantic index.
#[derive(Debug, Error)]
pub enum VecDbError {
    /// Model files are missing or unreadable.
    #[error("failed to load embedding model: {0}")]
    ModelLoad(String),

    /// The tokenizer rejected its configuration or an input.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Tensor computation failed.
    #[error("ML inference error: {0}")]
    Candle(String),

    /// The embedding corpus lacks required columns.
    #[error("corpus is missing required column(s): {}", columns.join(", "))]
    MissingColumns {
        /// Names of the absent columns.
        columns: Vec<String>,
    },

    /// The corpus has no usable rows.
    #[error("embedding corpus is empty")]
    EmptyCorpus,

    /// An embedder returned vectors of an unexpected width.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Width the index was built with.
        expected: usize,
        /// Width actually produced.
        actual: usize,
    },

    /// CSV reading failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying file system failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<candle_core::Error> for VecDbError {
    fn from(err: candle_core::Error) -> Self {
        Self::Candle(err.to_string())
    }
}

/// Result type alias for vector search operations.
pub type Result<T> = std::result::Result<T, VecDbError>;

//! # Termlint VecDB
//!
//! Semantic lookup of known incorrect term usages. A corpus of incorrect
//! sentences is embedded once, and sentences the rule stage could not
//! match are ranked against it by cosine similarity.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use termlint_core::Sentence;
//! use termlint_vecdb::{CorpusRecord, LexicalEmbedder, SemanticMatcher, SimilarityIndex};
//!
//! let index = SimilarityIndex::build(
//!     vec![CorpusRecord::new("особовий склад загинув", "втрати")],
//!     Box::new(LexicalEmbedder::new()),
//! )
//! .unwrap();
//! let matcher = SemanticMatcher::new(Arc::new(index));
//!
//! let hits = matcher
//!     .match_sentence(&Sentence::new(1, "Особовий склад загинув повністю"))
//!     .unwrap();
//! assert_eq!(hits[0].approved_term, "втрати");
//! ```

pub mod cache;
pub mod corpus;
pub mod embeddings;
pub mod error;
pub mod index;
pub mod search;

pub use cache::{CacheKey, IndexCache};
pub use corpus::{CorpusRecord, EmbeddingCorpus, load_corpus_records, read_corpus_records};
pub use embeddings::{BertEmbedder, Embedder, LexicalEmbedder, SemanticBackend};
pub use error::{Result, VecDbError};
pub use index::{SimilarityHit, SimilarityIndex};
pub use search::SemanticMatcher;

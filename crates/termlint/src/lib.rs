//! # Termlint
//!
//! Checks `.docx` and `.pdf` documents against a controlled terminology
//! dictionary. Forbidden variants and approved terms are found by
//! whole-word matching; sentences with no hit can then be compared with a
//! corpus of known incorrect usages by embedding similarity.
//!
//! ```no_run
//! use termlint::{AnalysisConfig, AnalysisSession, SemanticBackend};
//!
//! # fn main() -> termlint::Result<()> {
//! let mut session = AnalysisSession::new(AnalysisConfig::new().with_semantic(true))
//!     .with_corpus("corpus.csv")
//!     .with_backend(SemanticBackend::Neural {
//!         model_dir: "models/labse".into(),
//!     });
//! session.load_dictionary("dictionary.csv")?;
//!
//! let report = session.analyze("report.docx")?;
//! for m in report.matches() {
//!     println!("{m}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod pipeline;
pub mod session;

pub use error::{Error, Result};
pub use pipeline::{AnalysisReport, Analyzer, Finding, ReportSummary, SemanticOutcome};
pub use session::AnalysisSession;

pub use termlint_core::config::{
    DEFAULT_FUZZY_THRESHOLD, DEFAULT_SEMANTIC_THRESHOLD, DEFAULT_TOPN,
};
pub use termlint_core::{
    AnalysisConfig, DocumentFormat, DocumentPages, MatchResult, MatchType, RuleAnalysis,
    RuleMatcher, SemanticResult, Sentence, TermDictionary, TermEntry, TermlintError,
    highlight_term,
};
pub use termlint_vecdb::{SemanticBackend, SemanticMatcher, SimilarityIndex, VecDbError};


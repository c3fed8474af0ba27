use termlint_core::TermlintError;
use termlint_vecdb::VecDbError;
use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// Semantic-stage failures during [`crate::AnalysisSession::analyze`] are not
/// errors: they are reported through [`crate::SemanticOutcome::Unavailable`]
/// so rule-based results still come back.
#[derive(Debug, Error)]
pub enum Error {
    /// Dictionary, extraction or export failure.
    #[error(transparent)]
    Core(#[from] TermlintError),

    /// Semantic index failure when requested directly.
    #[error(transparent)]
    VecDb(#[from] VecDbError),

    /// Analysis was requested before a dictionary was loaded.
    #[error("no terminology dictionary loaded")]
    NoDictionary,

    /// A semantic index was requested without a corpus path.
    #[error("no semantic corpus configured")]
    NoCorpus,

    /// A semantic index was requested without choosing an embedder.
    #[error("no semantic backend configured")]
    NoBackend,
}

pub type Result<T> = std::result::Result<T, Error>;

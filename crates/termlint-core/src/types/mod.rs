pub mod document;
pub mod entry;
pub mod result;

pub use document::{DocumentPages, Sentence};
pub use entry::TermEntry;
pub use result::{MatchResult, MatchType, SemanticResult};

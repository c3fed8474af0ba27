//! # Termlint Core
//!
//! Rule-based terminology checking: loads a controlled terminology
//! dictionary, extracts page text from `.docx`/`.pdf` documents, splits it
//! into sentences and reports every whole-word use of a forbidden variant
//! or an approved term. Sentences with no hit are returned separately for
//! the semantic stage.
//!
//! ## Quick Start
//!
//! ```rust
//! use termlint_core::{DocumentPages, MatchType, RuleMatcher, TermDictionary, TermEntry};
//!
//! let dictionary = TermDictionary::new(vec![
//!     TermEntry::new("танк").with_wrong_usages(["бронетехніка"]),
//! ]);
//! let matcher = RuleMatcher::new(&dictionary).unwrap();
//! let analysis = matcher.analyze(&DocumentPages::single("Привезли бронетехніка. Танк стояв поруч."));
//!
//! assert_eq!(analysis.matches[0].match_type, MatchType::WrongUsage);
//! assert_eq!(analysis.matches[1].match_type, MatchType::ValidTerm);
//! assert!(analysis.unmatched.is_empty());
//! ```
pub mod config;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod extract;
pub mod matcher;
pub mod segment;
pub mod types;

// Re-export primary API
pub use config::AnalysisConfig;
pub use dictionary::TermDictionary;
pub use error::{Result, TermlintError};
pub use export::{
    export_rule_csv, export_semantic_csv, write_rule_csv, write_semantic_csv,
};
pub use extract::{DocumentFormat, extract_pages};
pub use matcher::{RuleAnalysis, RuleMatcher, TermPattern, analyze_document, highlight_term};
pub use segment::{SentenceSegmenter, split_sentences};
pub use types::{DocumentPages, MatchResult, MatchType, SemanticResult, Sentence, TermEntry};

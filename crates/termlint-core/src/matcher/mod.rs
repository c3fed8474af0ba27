pub mod pattern;
pub mod rule;

pub use pattern::{TermPattern, highlight_term};
pub use rule::{RuleAnalysis, RuleMatcher, analyze_document};

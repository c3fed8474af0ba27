use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a rule-based hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// A forbidden variant was found.
    WrongUsage,
    /// The approved term or one of its synonyms was found.
    ValidTerm,
}

impl MatchType {
    /// Wire name used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WrongUsage => "wrong_usage",
            Self::ValidTerm => "valid_term",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule-based hit: a (sentence, matched string) pair.
///
/// Field order is the column order of the rule report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 1-based page number.
    pub page: usize,
    #[serde(rename = "type")]
    pub match_type: MatchType,
    /// The dictionary string that matched, as written in the dictionary.
    pub found_term: String,
    pub approved_term: String,
    /// The trimmed sentence the hit was found in.
    pub context: String,
    pub category: String,
}

impl MatchResult {
    #[must_use]
    pub fn is_wrong_usage(&self) -> bool {
        self.match_type == MatchType::WrongUsage
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p.{} {} {:?} -> {:?}",
            self.page, self.match_type, self.found_term, self.approved_term
        )
    }
}

/// One semantic hit: an unmatched sentence close to a known wrong usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticResult {
    /// 1-based page number of the query sentence.
    pub page: usize,
    /// The unmatched sentence that was queried.
    pub sentence: String,
    /// Approved term attached to the retrieved exemplar.
    pub approved_term: String,
    /// The retrieved exemplar of incorrect usage.
    pub wrong_usage: String,
    /// Optional note attached to the exemplar.
    pub comment: String,
    /// Cosine similarity between the sentence and the exemplar.
    pub score: f32,
}

impl fmt::Display for SemanticResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p.{} {:?} ~ {:?} ({:.3}) -> {:?}",
            self.page, self.sentence, self.wrong_usage, self.score, self.approved_term
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_type_wire_names() {
        assert_eq!(MatchType::WrongUsage.to_string(), "wrong_usage");
        assert_eq!(MatchType::ValidTerm.as_str(), "valid_term");
    }

    #[test]
    fn match_result_display() {
        let result = MatchResult {
            page: 2,
            match_type: MatchType::WrongUsage,
            found_term: "бронетехніка".into(),
            approved_term: "танк".into(),
            context: "Привезли бронетехніка".into(),
            category: String::new(),
        };
        let display = result.to_string();
        assert!(display.starts_with("p.2 wrong_usage"));
        assert!(display.contains("бронетехніка"));
        assert!(result.is_wrong_usage());
    }

    #[test]
    fn semantic_result_display_rounds_score() {
        let result = SemanticResult {
            page: 1,
            sentence: "a".into(),
            approved_term: "b".into(),
            wrong_usage: "c".into(),
            comment: String::new(),
            score: 0.87654,
        };
        assert!(result.to_string().contains("(0.877)"));
    }
}

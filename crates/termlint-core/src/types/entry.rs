use serde::{Deserialize, Serialize};

/// One row of the terminology dictionary.
///
/// `approved_term` is the canonical form a document should use. Every string
/// in `wrong_usages` is a forbidden variant mapped to it, while `synonyms` are
/// acceptable alternates that are reported as valid usage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TermEntry {
    /// Canonical form (non-empty once loaded from a dictionary file).
    pub approved_term: String,

    /// Acceptable alternate spellings, in dictionary order.
    #[serde(default)]
    pub synonyms: Vec<String>,

    /// Free-form classification, may be empty.
    #[serde(default)]
    pub category: String,

    /// Forbidden variants, in dictionary order.
    #[serde(default)]
    pub wrong_usages: Vec<String>,

    /// Advisory usage examples. Never used for matching.
    #[serde(default)]
    pub context_examples: Vec<String>,
}

impl TermEntry {
    /// Creates an entry with only the approved term set.
    #[must_use]
    pub fn new(approved_term: impl Into<String>) -> Self {
        Self {
            approved_term: approved_term.into(),
            ..Self::default()
        }
    }

    /// Adds synonyms (builder style).
    #[must_use]
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.extend(synonyms.into_iter().map(Into::into));
        self
    }

    /// Adds forbidden variants (builder style).
    #[must_use]
    pub fn with_wrong_usages<I, S>(mut self, wrong_usages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wrong_usages.extend(wrong_usages.into_iter().map(Into::into));
        self
    }

    /// Sets the category (builder style).
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Adds advisory context examples (builder style).
    #[must_use]
    pub fn with_context_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_examples
            .extend(examples.into_iter().map(Into::into));
        self
    }

    /// The approved term followed by its synonyms, skipping empty strings.
    pub fn valid_terms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.approved_term.as_str())
            .chain(self.synonyms.iter().map(String::as_str))
            .filter(|s| !s.is_empty())
    }

    /// Returns `true` if the approved term is also listed as a wrong usage.
    ///
    /// Such entries are ambiguous: the same string is reported both as an
    /// error and as valid usage.
    #[must_use]
    pub fn is_self_contradictory(&self) -> bool {
        let approved = self.approved_term.to_lowercase();
        self.wrong_usages
            .iter()
            .any(|w| w.to_lowercase() == approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_terms_puts_approved_first() {
        let entry = TermEntry::new("танк").with_synonyms(["танк Т-64", ""]);
        let valid: Vec<_> = entry.valid_terms().collect();
        assert_eq!(valid, vec!["танк", "танк Т-64"]);
    }

    #[test]
    fn valid_terms_skips_empty_approved() {
        let entry = TermEntry::default().with_synonyms(["БМП"]);
        assert_eq!(entry.valid_terms().collect::<Vec<_>>(), vec!["БМП"]);
    }

    #[test]
    fn self_contradiction_is_case_insensitive() {
        let entry = TermEntry::new("Танк").with_wrong_usages(["танк"]);
        assert!(entry.is_self_contradictory());

        let entry = TermEntry::new("танк").with_wrong_usages(["бронетехніка"]);
        assert!(!entry.is_self_contradictory());
    }
}

use regex::{Captures, Regex, RegexBuilder};

use crate::error::Result;

/// A dictionary string compiled into a whole-word, case-insensitive pattern.
///
/// Word boundaries follow Unicode `\b` semantics, so `танк` matches
/// `"старий танк привезли"` but not `"танкіст прибув"`.
#[derive(Debug, Clone)]
pub struct TermPattern {
    term: String,
    regex: Regex,
}

impl TermPattern {
    /// Compiles `term` as an escaped literal between word boundaries.
    ///
    /// # Errors
    ///
    /// Returns `TermlintError::Regex` if the compiled pattern exceeds the
    /// regex size limit.
    pub fn new(term: &str) -> Result<Self> {
        let pattern = format!(r"\b{}\b", regex::escape(&term.to_lowercase()));
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            term: term.to_string(),
            regex,
        })
    }

    /// The dictionary string as written.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Tests a sentence that the caller has already lower-cased.
    #[must_use]
    pub fn is_match_lowered(&self, lowered: &str) -> bool {
        self.regex.is_match(lowered)
    }

    /// Tests a sentence in its original casing.
    #[must_use]
    pub fn is_match(&self, sentence: &str) -> bool {
        self.is_match_lowered(&sentence.to_lowercase())
    }

    /// Wraps every whole-word occurrence in `sentence` with `open`/`close`,
    /// keeping the sentence's own casing.
    #[must_use]
    pub fn highlight(&self, sentence: &str, open: &str, close: &str) -> String {
        self.regex
            .replace_all(sentence, |caps: &Captures<'_>| {
                format!("{open}{}{close}", &caps[0])
            })
            .into_owned()
    }
}

/// Wraps every occurrence of `term` in `sentence` with the given markers.
///
/// Returns the sentence unchanged when either argument is empty.
///
/// # Examples
/// ```
/// use termlint_core::highlight_term;
///
/// let marked = highlight_term("Танк стояв поруч", "танк", "[", "]");
/// assert_eq!(marked, "[Танк] стояв поруч");
/// ```
#[must_use]
pub fn highlight_term(sentence: &str, term: &str, open: &str, close: &str) -> String {
    if sentence.is_empty() || term.is_empty() {
        return sentence.to_string();
    }
    match TermPattern::new(term) {
        Ok(pattern) => pattern.highlight(sentence, open, close),
        Err(_) => sentence.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_word_only() {
        let pattern = TermPattern::new("танк").unwrap();
        assert!(!pattern.is_match("танкіст прибув"));
        assert!(pattern.is_match("старий танк привезли"));
        assert!(pattern.is_match("танк"));
        assert!(pattern.is_match("(танк)"));
    }

    #[test]
    fn case_insensitive() {
        let pattern = TermPattern::new("танк").unwrap();
        for sentence in ["Танк", "ТАНК", "танк"] {
            assert!(pattern.is_match(sentence), "{sentence}");
        }

        let upper = TermPattern::new("ЗСУ").unwrap();
        assert!(upper.is_match_lowered("підрозділ зсу"));
    }

    #[test]
    fn special_characters_are_literal() {
        let pattern = TermPattern::new("Т-64 (м)").unwrap();
        assert!(!pattern.is_match("Т-64 м"));

        let dotted = TermPattern::new("т.ч").unwrap();
        assert!(dotted.is_match("у т.ч броня"));
        assert!(!dotted.is_match("у тxч броня"));
    }

    #[test]
    fn multi_word_terms() {
        let pattern = TermPattern::new("особовий склад").unwrap();
        assert!(pattern.is_match("Особовий склад прибув"));
        assert!(!pattern.is_match("особовий складу"));
    }

    #[test]
    fn highlight_keeps_original_casing() {
        let marked = highlight_term("ТАНК і танк, але не танкіст", "танк", "<b>", "</b>");
        assert_eq!(marked, "<b>ТАНК</b> і <b>танк</b>, але не танкіст");
    }

    #[test]
    fn highlight_with_empty_inputs() {
        assert_eq!(highlight_term("", "танк", "[", "]"), "");
        assert_eq!(highlight_term("танк", "", "[", "]"), "танк");
    }
}

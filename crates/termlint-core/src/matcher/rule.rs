//! # Rule Matcher
//!
//! Scans every sentence against every dictionary entry and reports each
//! whole-word occurrence of a wrong usage, the approved term or a synonym.
//! Sentences with no hit at all form the unmatched set handed to the
//! semantic stage; both sets are produced in one pass so together they
//! cover every non-empty sentence exactly once.

use std::path::Path;

use tracing::{debug, info};

use crate::dictionary::TermDictionary;
use crate::error::Result;
use crate::extract::extract_pages;
use crate::matcher::pattern::TermPattern;
use crate::types::{DocumentPages, MatchResult, MatchType, Sentence, TermEntry};

/// Patterns of one dictionary entry, compiled once at construction.
#[derive(Debug, Clone)]
struct CompiledEntry {
    approved_term: String,
    category: String,
    wrong_usages: Vec<TermPattern>,
    valid_terms: Vec<TermPattern>,
}

impl CompiledEntry {
    fn compile(entry: &TermEntry) -> Result<Self> {
        let wrong_usages = entry
            .wrong_usages
            .iter()
            .filter(|w| !w.is_empty())
            .map(|w| TermPattern::new(w))
            .collect::<Result<Vec<_>>>()?;
        let valid_terms = entry
            .valid_terms()
            .map(TermPattern::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            approved_term: entry.approved_term.clone(),
            category: entry.category.clone(),
            wrong_usages,
            valid_terms,
        })
    }

    fn candidates(&self) -> impl Iterator<Item = (MatchType, &TermPattern)> {
        self.wrong_usages
            .iter()
            .map(|p| (MatchType::WrongUsage, p))
            .chain(self.valid_terms.iter().map(|p| (MatchType::ValidTerm, p)))
    }
}

/// Outcome of rule-based analysis of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleAnalysis {
    /// Every hit, in page / sentence / entry / candidate order.
    pub matches: Vec<MatchResult>,
    /// Sentences that produced no hit, in document order.
    pub unmatched: Vec<Sentence>,
    /// Number of non-empty sentences scanned.
    pub sentence_count: usize,
}

impl RuleAnalysis {
    #[must_use]
    pub fn wrong_usage_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_wrong_usage()).count()
    }

    #[must_use]
    pub fn valid_term_count(&self) -> usize {
        self.matches.len() - self.wrong_usage_count()
    }

    /// Number of distinct sentences with at least one hit.
    #[must_use]
    pub fn matched_sentence_count(&self) -> usize {
        self.sentence_count - self.unmatched.len()
    }
}

/// Dictionary-driven whole-word matcher.
///
/// Construction compiles one pattern per candidate string; matching itself
/// never fails.
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    entries: Vec<CompiledEntry>,
}

impl RuleMatcher {
    /// Compiles the patterns of every entry in `dictionary`.
    ///
    /// # Errors
    ///
    /// Returns `TermlintError::Regex` only if a dictionary string is so long
    /// that its pattern exceeds the regex size limit.
    pub fn new(dictionary: &TermDictionary) -> Result<Self> {
        let entries = dictionary
            .iter()
            .map(CompiledEntry::compile)
            .collect::<Result<Vec<_>>>()?;
        debug!(
            entries = entries.len(),
            patterns = entries
                .iter()
                .map(|e| e.wrong_usages.len() + e.valid_terms.len())
                .sum::<usize>(),
            "compiled rule patterns"
        );
        Ok(Self { entries })
    }

    /// Returns every hit in one sentence. All candidates of all entries are
    /// tested; there is no first-match short-circuit.
    #[must_use]
    pub fn match_sentence(&self, sentence: &Sentence) -> Vec<MatchResult> {
        let mut results = Vec::new();
        self.collect_matches(sentence, &mut results);
        results
    }

    fn collect_matches(&self, sentence: &Sentence, out: &mut Vec<MatchResult>) {
        let lowered = sentence.text.to_lowercase();
        for entry in &self.entries {
            for (match_type, pattern) in entry.candidates() {
                if pattern.is_match_lowered(&lowered) {
                    out.push(MatchResult {
                        page: sentence.page,
                        match_type,
                        found_term: pattern.term().to_string(),
                        approved_term: entry.approved_term.clone(),
                        context: sentence.text.clone(),
                        category: entry.category.clone(),
                    });
                }
            }
        }
    }

    /// Analyzes already-extracted pages, partitioning sentences into matched
    /// and unmatched in a single pass.
    #[must_use]
    pub fn analyze(&self, pages: &DocumentPages) -> RuleAnalysis {
        let mut analysis = RuleAnalysis::default();

        for sentence in pages.sentences() {
            analysis.sentence_count += 1;
            let before = analysis.matches.len();
            self.collect_matches(&sentence, &mut analysis.matches);
            if analysis.matches.len() == before {
                analysis.unmatched.push(sentence);
            }
        }

        info!(
            sentences = analysis.sentence_count,
            wrong_usages = analysis.wrong_usage_count(),
            valid_terms = analysis.valid_term_count(),
            unmatched = analysis.unmatched.len(),
            "rule analysis complete"
        );
        analysis
    }

    /// Extracts a document from disk and analyzes it.
    ///
    /// # Errors
    ///
    /// Fails with the same errors as [`extract_pages`], including
    /// `UnsupportedFormat` for unrecognized extensions.
    pub fn analyze_path(&self, path: impl AsRef<Path>) -> Result<RuleAnalysis> {
        let pages = extract_pages(path)?;
        Ok(self.analyze(&pages))
    }

    /// Sentences of `pages` that produce no hit.
    ///
    /// Uses the exact segmentation and matching of [`RuleMatcher::analyze`].
    #[must_use]
    pub fn unmatched_sentences(&self, pages: &DocumentPages) -> Vec<Sentence> {
        pages
            .sentences()
            .filter(|sentence| {
                let lowered = sentence.text.to_lowercase();
                !self
                    .entries
                    .iter()
                    .flat_map(CompiledEntry::candidates)
                    .any(|(_, pattern)| pattern.is_match_lowered(&lowered))
            })
            .collect()
    }

    /// Number of compiled dictionary entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rule-based analysis of a document file against a dictionary.
pub fn analyze_document(
    path: impl AsRef<Path>,
    dictionary: &TermDictionary,
) -> Result<RuleAnalysis> {
    RuleMatcher::new(dictionary)?.analyze_path(path)
}

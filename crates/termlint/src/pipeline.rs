//! # Analysis Pipeline
//!
//! Extraction, segmentation and rule matching, followed by semantic
//! lookup of the sentences the rules left unmatched.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use termlint_core::{
    DocumentPages, MatchResult, RuleAnalysis, RuleMatcher, SemanticResult, Sentence,
    TermDictionary, extract_pages, write_rule_csv, write_semantic_csv,
};
use termlint_vecdb::SemanticMatcher;
use tracing::{info, warn};

use crate::error::Result;

/// What became of the semantic stage for one report.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SemanticOutcome {
    /// Semantic search was not requested.
    #[default]
    Disabled,
    /// Semantic search ran over every unmatched sentence.
    Completed(Vec<SemanticResult>),
    /// Semantic search was requested but its model, corpus or inference
    /// failed.
    Unavailable { reason: String },
}

impl SemanticOutcome {
    /// Semantic hits, empty unless the stage completed.
    #[must_use]
    pub fn results(&self) -> &[SemanticResult] {
        match self {
            Self::Completed(results) => results,
            Self::Disabled | Self::Unavailable { .. } => &[],
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// One row of the fused view, in page order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Finding<'a> {
    Rule(&'a MatchResult),
    Semantic(&'a SemanticResult),
}

impl Finding<'_> {
    #[must_use]
    pub fn page(&self) -> usize {
        match self {
            Self::Rule(m) => m.page,
            Self::Semantic(s) => s.page,
        }
    }
}

/// Counts printed by front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub sentences: usize,
    pub wrong_usages: usize,
    pub valid_terms: usize,
    pub unmatched: usize,
    pub semantic_hits: usize,
}

/// Rule and semantic results for one document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisReport {
    /// Source path, when the report came from a file.
    pub document: Option<PathBuf>,
    pub rule: RuleAnalysis,
    pub semantic: SemanticOutcome,
}

impl AnalysisReport {
    #[must_use]
    pub fn matches(&self) -> &[MatchResult] {
        &self.rule.matches
    }

    #[must_use]
    pub fn unmatched(&self) -> &[Sentence] {
        &self.rule.unmatched
    }

    #[must_use]
    pub fn semantic_results(&self) -> &[SemanticResult] {
        self.semantic.results()
    }

    /// Rule and semantic rows merged by page. Within a page, rule hits come
    /// first, each stream keeping its own order.
    pub fn findings(&self) -> Vec<Finding<'_>> {
        let mut findings: Vec<Finding<'_>> = self
            .rule
            .matches
            .iter()
            .map(Finding::Rule)
            .chain(self.semantic.results().iter().map(Finding::Semantic))
            .collect();
        findings.sort_by_key(Finding::page);
        findings
    }

    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            sentences: self.rule.sentence_count,
            wrong_usages: self.rule.wrong_usage_count(),
            valid_terms: self.rule.valid_term_count(),
            unmatched: self.rule.unmatched.len(),
            semantic_hits: self.semantic.results().len(),
        }
    }

    /// Writes the rule-based CSV report.
    pub fn write_rule_csv<W: Write>(&self, writer: W) -> Result<()> {
        Ok(write_rule_csv(&self.rule.matches, writer)?)
    }

    /// Writes the semantic CSV report (header only unless the stage
    /// completed with hits).
    pub fn write_semantic_csv<W: Write>(&self, writer: W) -> Result<()> {
        Ok(write_semantic_csv(self.semantic.results(), writer)?)
    }
}

#[derive(Debug, Clone, Default)]
enum SemanticStage {
    #[default]
    Disabled,
    Ready(SemanticMatcher),
    Unavailable(String),
}

/// Runs the full pipeline for documents against one dictionary.
#[derive(Debug, Clone)]
pub struct Analyzer {
    matcher: RuleMatcher,
    semantic: SemanticStage,
}

impl Analyzer {
    /// Compiles `dictionary` into a rule matcher. The semantic stage starts
    /// disabled.
    pub fn new(dictionary: &TermDictionary) -> Result<Self> {
        Ok(Self::from_matcher(RuleMatcher::new(dictionary)?))
    }

    #[must_use]
    pub fn from_matcher(matcher: RuleMatcher) -> Self {
        Self {
            matcher,
            semantic: SemanticStage::Disabled,
        }
    }

    /// Enables the semantic stage.
    #[must_use]
    pub fn with_semantic(mut self, matcher: SemanticMatcher) -> Self {
        self.semantic = SemanticStage::Ready(matcher);
        self
    }

    /// Marks the semantic stage as requested but unavailable. Reports carry
    /// `reason` instead of semantic hits.
    #[must_use]
    pub fn with_semantic_unavailable(mut self, reason: impl Into<String>) -> Self {
        self.semantic = SemanticStage::Unavailable(reason.into());
        self
    }

    #[must_use]
    pub fn rule_matcher(&self) -> &RuleMatcher {
        &self.matcher
    }

    /// Extracts and analyzes the document at `path`.
    ///
    /// # Errors
    ///
    /// Unsupported format or extraction failure. Semantic failures end up in
    /// [`AnalysisReport::semantic`].
    pub fn analyze_path(&self, path: impl AsRef<Path>) -> Result<AnalysisReport> {
        let path = path.as_ref();
        let pages = extract_pages(path)?;
        let mut report = self.analyze_pages(&pages);
        report.document = Some(path.to_path_buf());
        info!(
            document = %path.display(),
            pages = pages.len(),
            matches = report.rule.matches.len(),
            semantic_hits = report.semantic.results().len(),
            "document analyzed"
        );
        Ok(report)
    }

    /// Analyzes already extracted pages.
    pub fn analyze_pages(&self, pages: &DocumentPages) -> AnalysisReport {
        let rule = self.matcher.analyze(pages);

        let semantic = match &self.semantic {
            SemanticStage::Disabled => SemanticOutcome::Disabled,
            SemanticStage::Unavailable(reason) => SemanticOutcome::Unavailable {
                reason: reason.clone(),
            },
            SemanticStage::Ready(matcher) => match matcher.match_sentences(&rule.unmatched) {
                Ok(results) => SemanticOutcome::Completed(results),
                Err(err) => {
                    warn!(error = %err, "semantic matching failed");
                    SemanticOutcome::Unavailable {
                        reason: err.to_string(),
                    }
                }
            },
        };

        AnalysisReport {
            document: None,
            rule,
            semantic,
        }
    }
}

//! # Analysis Session
//!
//! Typed state shared across analyses: configuration, the loaded
//! dictionary and its compiled matcher, the last analyzed document and its
//! report, and the semantic index cache. The cache outlives [`reset`]
//! because building an index embeds the whole corpus.
//!
//! [`reset`]: AnalysisSession::reset

use std::path::{Path, PathBuf};
use std::sync::Arc;

use termlint_core::{AnalysisConfig, RuleMatcher, TermDictionary};
use termlint_vecdb::{IndexCache, SemanticBackend, SemanticMatcher, SimilarityIndex};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::pipeline::{AnalysisReport, Analyzer};

#[derive(Debug, Clone)]
struct LoadedDictionary {
    source: Option<PathBuf>,
    dictionary: TermDictionary,
    matcher: RuleMatcher,
}

/// Composition root for repeated analyses.
#[derive(Debug)]
pub struct AnalysisSession {
    config: AnalysisConfig,
    backend: Option<SemanticBackend>,
    corpus: Option<PathBuf>,
    dictionary: Option<LoadedDictionary>,
    document: Option<PathBuf>,
    last_report: Option<AnalysisReport>,
    indexes: IndexCache,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AnalysisSession {
    /// Creates an empty session. No semantic backend is selected until
    /// [`AnalysisSession::with_backend`] is called.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            backend: None,
            corpus: None,
            dictionary: None,
            document: None,
            last_report: None,
            indexes: IndexCache::new(),
        }
    }

    /// Sets the semantic corpus CSV.
    #[must_use]
    pub fn with_corpus(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus = Some(path.into());
        self
    }

    /// Sets the embedder used for the semantic stage.
    #[must_use]
    pub fn with_backend(mut self, backend: SemanticBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn backend(&self) -> Option<&SemanticBackend> {
        self.backend.as_ref()
    }

    #[must_use]
    pub fn corpus_path(&self) -> Option<&Path> {
        self.corpus.as_deref()
    }

    /// Loads and compiles the dictionary at `path`, replacing any previous one.
    pub fn load_dictionary(&mut self, path: impl AsRef<Path>) -> Result<&TermDictionary> {
        let path = path.as_ref();
        let dictionary = TermDictionary::load_csv(path)?;
        self.install_dictionary(dictionary, Some(path.to_path_buf()))
    }

    /// Uses a dictionary built in memory.
    pub fn set_dictionary(&mut self, dictionary: TermDictionary) -> Result<&TermDictionary> {
        self.install_dictionary(dictionary, None)
    }

    fn install_dictionary(
        &mut self,
        dictionary: TermDictionary,
        source: Option<PathBuf>,
    ) -> Result<&TermDictionary> {
        let matcher = RuleMatcher::new(&dictionary)?;
        let loaded = self.dictionary.insert(LoadedDictionary {
            source,
            dictionary,
            matcher,
        });
        Ok(&loaded.dictionary)
    }

    #[must_use]
    pub fn dictionary(&self) -> Option<&TermDictionary> {
        self.dictionary.as_ref().map(|d| &d.dictionary)
    }

    /// Path the current dictionary was loaded from, if any.
    #[must_use]
    pub fn dictionary_path(&self) -> Option<&Path> {
        self.dictionary.as_ref().and_then(|d| d.source.as_deref())
    }

    /// Path of the last analyzed document.
    #[must_use]
    pub fn document_path(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    /// File name of the last analyzed document.
    #[must_use]
    pub fn document_name(&self) -> Option<&str> {
        self.document
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&AnalysisReport> {
        self.last_report.as_ref()
    }

    /// Returns the similarity index for the configured corpus and backend,
    /// building it on first use.
    ///
    /// # Errors
    ///
    /// `Error::NoCorpus` without a corpus path, `Error::NoBackend` without a
    /// backend, otherwise whatever loading the model or embedding the corpus
    /// raises.
    pub fn semantic_index(&mut self) -> Result<Arc<SimilarityIndex>> {
        let corpus = self.corpus.as_deref().ok_or(Error::NoCorpus)?;
        let backend = self.backend.as_ref().ok_or(Error::NoBackend)?;
        Ok(self.indexes.get_or_load(corpus, backend)?)
    }

    /// Number of similarity indexes built so far.
    #[must_use]
    pub fn cached_indexes(&self) -> usize {
        self.indexes.len()
    }

    /// Builds an analyzer from the current dictionary and configuration.
    ///
    /// With the semantic stage enabled, a failure to build the index is
    /// recorded on the analyzer rather than returned.
    pub fn analyzer(&mut self) -> Result<Analyzer> {
        let matcher = self
            .dictionary
            .as_ref()
            .map(|d| d.matcher.clone())
            .ok_or(Error::NoDictionary)?;
        let analyzer = Analyzer::from_matcher(matcher);

        if !self.config.semantic_enabled {
            return Ok(analyzer);
        }
        match self.semantic_index() {
            Ok(index) => Ok(analyzer.with_semantic(SemanticMatcher::from_config(index, &self.config))),
            Err(err) => {
                warn!(error = %err, "semantic analysis unavailable");
                Ok(analyzer.with_semantic_unavailable(err.to_string()))
            }
        }
    }

    /// Analyzes the document at `path` and keeps the report as the session's
    /// last result.
    ///
    /// # Errors
    ///
    /// `Error::NoDictionary` before a dictionary is loaded, or an extraction
    /// error. A failed semantic stage is reported in the returned report.
    pub fn analyze(&mut self, path: impl AsRef<Path>) -> Result<&AnalysisReport> {
        let path = path.as_ref();
        let report = self.analyzer()?.analyze_path(path)?;
        info!(
            document = %path.display(),
            wrong_usages = report.rule.wrong_usage_count(),
            valid_terms = report.rule.valid_term_count(),
            unmatched = report.rule.unmatched.len(),
            "analysis complete"
        );
        self.document = Some(path.to_path_buf());
        Ok(self.last_report.insert(report))
    }

    /// Drops the last report and keeps everything else.
    pub fn clear_results(&mut self) {
        self.last_report = None;
    }

    /// Drops the dictionary, document and report. Configuration and cached
    /// similarity indexes are kept.
    pub fn reset(&mut self) {
        self.dictionary = None;
        self.document = None;
        self.last_report = None;
    }
}

//! # Semantic Matcher
//!
//! Looks up sentences the rule stage left unmatched in the similarity
//! index and converts hits into [`SemanticResult`]s.

use std::sync::Arc;

use termlint_core::config::{DEFAULT_SEMANTIC_THRESHOLD, DEFAULT_TOPN};
use termlint_core::{AnalysisConfig, SemanticResult, Sentence};
use tracing::info;

use crate::error::Result;
use crate::index::{SimilarityHit, SimilarityIndex};

/// Sentences sent to the embedder per call.
pub const QUERY_BATCH_SIZE: usize = 64;

/// Runs similarity search for sentences against a shared index.
#[derive(Debug, Clone)]
pub struct SemanticMatcher {
    index: Arc<SimilarityIndex>,
    topn: usize,
    threshold: f32,
}

impl SemanticMatcher {
    /// Uses the default limits: 5 hits per sentence, score at least 0.8.
    pub fn new(index: Arc<SimilarityIndex>) -> Self {
        Self {
            index,
            topn: DEFAULT_TOPN,
            threshold: DEFAULT_SEMANTIC_THRESHOLD,
        }
    }

    /// Takes `topn` and the threshold from an analysis configuration.
    pub fn from_config(index: Arc<SimilarityIndex>, config: &AnalysisConfig) -> Self {
        Self::new(index)
            .with_topn(config.topn)
            .with_threshold(config.semantic_threshold)
    }

    pub fn with_topn(mut self, topn: usize) -> Self {
        self.topn = topn.max(1);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    /// Hits for one sentence, best first.
    pub fn match_sentence(&self, sentence: &Sentence) -> Result<Vec<SemanticResult>> {
        let hits = self.index.search(&sentence.text, self.topn, self.threshold)?;
        Ok(hits.into_iter().map(|hit| to_result(sentence, hit)).collect())
    }

    /// Hits for every sentence, grouped by sentence in input order and best
    /// first within a sentence.
    pub fn match_sentences(&self, sentences: &[Sentence]) -> Result<Vec<SemanticResult>> {
        let mut results = Vec::new();
        for chunk in sentences.chunks(QUERY_BATCH_SIZE) {
            let queries: Vec<&str> = chunk.iter().map(|s| s.text.as_str()).collect();
            let batch = self.index.search_batch(&queries, self.topn, self.threshold)?;
            for (sentence, hits) in chunk.iter().zip(batch) {
                results.extend(hits.into_iter().map(|hit| to_result(sentence, hit)));
            }
        }
        info!(
            sentences = sentences.len(),
            hits = results.len(),
            threshold = self.threshold,
            "semantic matching complete"
        );
        Ok(results)
    }
}

fn to_result(sentence: &Sentence, hit: SimilarityHit<'_>) -> SemanticResult {
    SemanticResult {
        page: sentence.page,
        sentence: sentence.text.clone(),
        approved_term: hit.record.approved_term.clone(),
        wrong_usage: hit.record.wrong_usage.clone(),
        comment: hit.record.comment.clone(),
        score: hit.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusRecord;
    use crate::embeddings::LexicalEmbedder;

    fn matcher() -> SemanticMatcher {
        let index = SimilarityIndex::build(
            vec![
                CorpusRecord::new("особовий склад загинув", "втрати")
                    .with_comment("Вживати «втрати особового складу»"),
                CorpusRecord::new("бронетехніка знищена", "танк"),
            ],
            Box::new(LexicalEmbedder::new()),
        )
        .unwrap();
        SemanticMatcher::new(Arc::new(index))
    }

    #[test]
    fn paraphrase_reported_with_page_and_comment() {
        let sentence = Sentence::new(2, "Особовий склад загинув повністю");
        let results = matcher().match_sentence(&sentence).unwrap();

        assert_eq!(results.len(), 1);
        let hit = &results[0];
        assert_eq!(hit.page, 2);
        assert_eq!(hit.sentence, "Особовий склад загинув повністю");
        assert_eq!(hit.approved_term, "втрати");
        assert_eq!(hit.wrong_usage, "особовий склад загинув");
        assert_eq!(hit.comment, "Вживати «втрати особового складу»");
        assert!(hit.score >= 0.8);
    }

    #[test]
    fn unrelated_sentence_yields_nothing() {
        let results = matcher()
            .match_sentence(&Sentence::new(1, "Погода сьогодні сонячна"))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn batches_preserve_sentence_order() {
        let matcher = matcher().with_threshold(0.8);
        let sentences: Vec<_> = (0..QUERY_BATCH_SIZE + 2)
            .map(|i| {
                let text = if i % 2 == 0 {
                    "Особовий склад загинув повністю"
                } else {
                    "Бронетехніка знищена вщент"
                };
                Sentence::new(i + 1, text)
            })
            .collect();

        let results = matcher.match_sentences(&sentences).unwrap();
        let pages: Vec<_> = results.iter().map(|r| r.page).collect();
        let mut sorted = pages.clone();
        sorted.sort_unstable();
        assert_eq!(pages, sorted);
        assert!(results.iter().all(|r| r.score >= 0.8));
        assert_eq!(results.first().unwrap().approved_term, "втрати");
    }

    #[test]
    fn no_sentences_no_results() {
        assert!(matcher().match_sentences(&[]).unwrap().is_empty());
    }

    #[test]
    fn config_limits_are_applied() {
        let config = AnalysisConfig::new().with_topn(1).with_semantic_threshold(0.0);
        let matcher = SemanticMatcher::from_config(matcher().index.clone(), &config);
        let results = matcher
            .match_sentence(&Sentence::new(1, "склад знищена"))
            .unwrap();
        assert_eq!(results.len(), 1);
    }
}

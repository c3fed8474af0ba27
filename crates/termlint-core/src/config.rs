//! # Analysis Configuration
//!
//! Caller-tunable knobs for one analysis run.

use serde::{Deserialize, Serialize};

/// Default fuzzy threshold carried for compatibility with existing dictionaries
/// and front-ends.
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 88;
/// Default minimum cosine similarity for semantic hits.
pub const DEFAULT_SEMANTIC_THRESHOLD: f32 = 0.8;
/// Default maximum number of semantic hits per sentence.
pub const DEFAULT_TOPN: usize = 5;

/// Configuration for an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Reserved for edit-distance matching. The literal word-boundary
    /// matcher does not read it.
    pub fuzzy_threshold: u8,
    /// Minimum cosine similarity in `[0.0, 1.0]` for a semantic hit.
    pub semantic_threshold: f32,
    /// Maximum semantic hits returned per unmatched sentence.
    pub topn: usize,
    /// Whether the semantic stage runs at all.
    pub semantic_enabled: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            semantic_threshold: DEFAULT_SEMANTIC_THRESHOLD,
            topn: DEFAULT_TOPN,
            semantic_enabled: false,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fuzzy threshold, capped at 100.
    pub fn with_fuzzy_threshold(mut self, threshold: u8) -> Self {
        self.fuzzy_threshold = threshold.min(100);
        self
    }

    /// Set the semantic similarity cutoff, clamped to `[0.0, 1.0]`.
    pub fn with_semantic_threshold(mut self, threshold: f32) -> Self {
        self.semantic_threshold = if threshold.is_nan() {
            DEFAULT_SEMANTIC_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }

    /// Set the per-sentence semantic hit limit (at least 1).
    pub fn with_topn(mut self, topn: usize) -> Self {
        self.topn = topn.max(1);
        self
    }

    /// Enable or disable the semantic stage.
    pub fn with_semantic(mut self, enabled: bool) -> Self {
        self.semantic_enabled = enabled;
        self
    }
}

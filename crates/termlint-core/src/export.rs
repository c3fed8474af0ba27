//! # Report Export
//!
//! Flat CSV serialization of rule-based and semantic results. The header
//! row is written unconditionally, so an empty result set still produces a
//! well-formed report.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::types::{MatchResult, SemanticResult};

/// Header of the rule-based report.
pub const RULE_REPORT_COLUMNS: [&str; 6] = [
    "page",
    "type",
    "found_term",
    "approved_term",
    "context",
    "category",
];

/// Header of the semantic report.
pub const SEMANTIC_REPORT_COLUMNS: [&str; 6] = [
    "page",
    "sentence",
    "approved_term",
    "wrong_usage",
    "comment",
    "score",
];

#[derive(Serialize)]
struct SemanticRow<'a> {
    page: usize,
    sentence: &'a str,
    approved_term: &'a str,
    wrong_usage: &'a str,
    comment: &'a str,
    score: f64,
}

impl<'a> From<&'a SemanticResult> for SemanticRow<'a> {
    fn from(result: &'a SemanticResult) -> Self {
        Self {
            page: result.page,
            sentence: &result.sentence,
            approved_term: &result.approved_term,
            wrong_usage: &result.wrong_usage,
            comment: &result.comment,
            score: round_score(result.score),
        }
    }
}

/// Rounds a similarity score to 3 decimal places for reporting.
#[must_use]
pub fn round_score(score: f32) -> f64 {
    (f64::from(score) * 1000.0).round() / 1000.0
}

fn writer_for<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer)
}

/// Writes rule-based results as CSV.
pub fn write_rule_csv<W: Write>(results: &[MatchResult], writer: W) -> Result<()> {
    let mut writer = writer_for(writer);
    writer.write_record(RULE_REPORT_COLUMNS)?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes semantic results as CSV, scores rounded to 3 decimals.
pub fn write_semantic_csv<W: Write>(results: &[SemanticResult], writer: W) -> Result<()> {
    let mut writer = writer_for(writer);
    writer.write_record(SEMANTIC_REPORT_COLUMNS)?;
    for result in results {
        writer.serialize(SemanticRow::from(result))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the rule-based report to `path`, replacing any existing file.
pub fn export_rule_csv(results: &[MatchResult], path: impl AsRef<Path>) -> Result<()> {
    write_rule_csv(results, File::create(path)?)
}

/// Writes the semantic report to `path`, replacing any existing file.
pub fn export_semantic_csv(results: &[SemanticResult], path: impl AsRef<Path>) -> Result<()> {
    write_semantic_csv(results, File::create(path)?)
}

/// Reads a rule-based report back. Not used by the pipeline itself.
pub fn read_rule_csv<R: std::io::Read>(reader: R) -> Result<Vec<MatchResult>> {
    let mut reader = csv::Reader::from_reader(reader);
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<MatchResult>, _>>()
        .map_err(Into::into)
}

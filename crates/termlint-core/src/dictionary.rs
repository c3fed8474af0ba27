//! # Dictionary Loader
//!
//! Reads and writes the terminology dictionary CSV:
//!
//! ```text
//! approved_term,synonyms,category,wrong_usages,context_examples
//! танк,танк Т-64;Т-64,техніка,бронетехніка;бронемашина,Танк вийшов на позицію
//! ```
//!
//! Multi-valued fields are `;`-joined. Every value is trimmed and empty
//! segments are dropped.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Result, TermlintError};
use crate::types::TermEntry;

/// Dictionary header, in file order.
pub const DICTIONARY_COLUMNS: [&str; 5] = [
    "approved_term",
    "synonyms",
    "category",
    "wrong_usages",
    "context_examples",
];

/// Columns without which a dictionary cannot be loaded. The remaining
/// columns default to empty values when absent.
pub const REQUIRED_COLUMNS: [&str; 2] = ["approved_term", "synonyms"];

/// Separator used inside multi-valued fields.
pub const MULTI_VALUE_SEPARATOR: char = ';';

/// Ordered, immutable set of term entries loaded from one source.
///
/// Duplicate approved terms are kept as separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TermDictionary {
    entries: Vec<TermEntry>,
}

impl TermDictionary {
    /// Wraps entries built in code.
    #[must_use]
    pub fn new(entries: Vec<TermEntry>) -> Self {
        Self { entries }
    }

    /// Loads a dictionary CSV from disk.
    ///
    /// # Errors
    ///
    /// Returns `TermlintError::MissingColumns` if a required column is absent,
    /// or an I/O / CSV error if the file cannot be read.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dictionary = Self::from_reader(File::open(path)?)?;
        info!(
            path = %path.display(),
            entries = dictionary.len(),
            "loaded terminology dictionary"
        );
        Ok(dictionary)
    }

    /// Parses a dictionary from any CSV byte source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| column(name).is_none())
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(TermlintError::MissingColumns { columns: missing });
        }

        let [approved, synonyms, category, wrong, examples] = DICTIONARY_COLUMNS.map(column);

        let mut entries = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let field = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("");

            let approved_term = field(approved).trim();
            if approved_term.is_empty() {
                warn!(row = idx + 2, "skipping dictionary row with empty approved_term");
                continue;
            }

            entries.push(TermEntry {
                approved_term: approved_term.to_string(),
                synonyms: split_multi_value(field(synonyms)),
                category: field(category).trim().to_string(),
                wrong_usages: split_multi_value(field(wrong)),
                context_examples: split_multi_value(field(examples)),
            });
        }

        let dictionary = Self { entries };
        dictionary.log_ambiguities();
        Ok(dictionary)
    }

    /// Writes the dictionary CSV to disk, replacing any existing file.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.write_csv(File::create(path)?)?;
        info!(path = %path.display(), entries = self.len(), "saved terminology dictionary");
        Ok(())
    }

    /// Serializes the dictionary as CSV. The header is always written.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(DICTIONARY_COLUMNS)?;

        let separator = MULTI_VALUE_SEPARATOR.to_string();
        for entry in &self.entries {
            writer.write_record([
                entry.approved_term.as_str(),
                &entry.synonyms.join(&separator),
                &entry.category,
                &entry.wrong_usages.join(&separator),
                &entry.context_examples.join(&separator),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    #[must_use]
    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TermEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sharing an approved term with an earlier entry.
    pub fn duplicates(&self) -> Vec<&TermEntry> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| !seen.insert(e.approved_term.to_lowercase()))
            .collect()
    }

    fn log_ambiguities(&self) {
        for entry in self.duplicates() {
            warn!(
                approved_term = %entry.approved_term,
                "approved_term appears in more than one entry"
            );
        }
        for entry in self.entries.iter().filter(|e| e.is_self_contradictory()) {
            warn!(
                approved_term = %entry.approved_term,
                "approved_term is also listed as a wrong usage"
            );
        }
        debug!(entries = self.len(), "dictionary checked for ambiguities");
    }
}

impl<'a> IntoIterator for &'a TermDictionary {
    type Item = &'a TermEntry;
    type IntoIter = std::slice::Iter<'a, TermEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Vec<TermEntry>> for TermDictionary {
    fn from(entries: Vec<TermEntry>) -> Self {
        Self::new(entries)
    }
}

/// Splits a `;`-joined field, trimming values and dropping empty ones.
#[must_use]
pub fn split_multi_value(value: &str) -> Vec<String> {
    value
        .split(MULTI_VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

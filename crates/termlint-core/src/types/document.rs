use serde::{Deserialize, Serialize};

use crate::segment::split_sentences;

/// Plain text of a document, one block per page.
///
/// Formats without page structure produce a single block. A page without an
/// extractable text layer is an empty string, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentPages {
    pages: Vec<String>,
}

impl DocumentPages {
    /// Wraps already-extracted page blocks.
    #[must_use]
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Convenience constructor for a single-page document.
    #[must_use]
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            pages: vec![text.into()],
        }
    }

    /// Number of pages, including blank ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns `true` if the document has no pages at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Returns `true` if every page is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }

    /// Page blocks in document order (index 0 is page 1).
    #[must_use]
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Every non-empty sentence of the document, in page then text order.
    pub fn sentences(&self) -> impl Iterator<Item = Sentence> + '_ {
        self.pages.iter().enumerate().flat_map(|(idx, text)| {
            split_sentences(text).map(move |s| Sentence::new(idx + 1, s))
        })
    }

    /// Consumes the wrapper and returns the page blocks.
    #[must_use]
    pub fn into_pages(self) -> Vec<String> {
        self.pages
    }
}

impl From<Vec<String>> for DocumentPages {
    fn from(pages: Vec<String>) -> Self {
        Self::new(pages)
    }
}

/// A trimmed sentence together with the page it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sentence {
    /// 1-based page number.
    pub page: usize,
    /// Sentence text with surrounding whitespace removed.
    pub text: String,
}

impl Sentence {
    #[must_use]
    pub fn new(page: usize, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
        }
    }
}

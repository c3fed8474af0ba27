//! # Text Extractor
//!
//! Turns a source document into [`DocumentPages`]. The set of supported
//! formats is closed: each [`DocumentFormat`] variant is bound to its own
//! extraction routine, and anything else is rejected before the file is
//! opened.

pub mod docx;
pub mod pdf;

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TermlintError};
use crate::types::DocumentPages;

/// Recognized document formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Office Open XML word processing document. Extracted as one page.
    Docx,
    /// PDF with a text layer. Extracted page by page, no OCR.
    Pdf,
    /// Any other extension (lower-cased, without the dot). Always fails.
    Unsupported(String),
}

impl DocumentFormat {
    /// Classifies a path by its extension, case-insensitively.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        Self::from_extension(&extension)
    }

    /// Classifies a bare extension such as `"pdf"` or `".DOCX"`.
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.trim_start_matches('.').to_lowercase();
        match extension.as_str() {
            "docx" => Self::Docx,
            "pdf" => Self::Pdf,
            _ => Self::Unsupported(extension),
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Extracts page blocks from raw document bytes.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` for [`DocumentFormat::Unsupported`], `Extraction`
    /// if the container itself cannot be decoded.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<DocumentPages> {
        match self {
            Self::Docx => docx::extract_docx(bytes),
            Self::Pdf => pdf::extract_pdf(bytes),
            Self::Unsupported(extension) => Err(TermlintError::UnsupportedFormat {
                extension: extension.clone(),
            }),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Docx => write!(f, "docx"),
            Self::Pdf => write!(f, "pdf"),
            Self::Unsupported(ext) if ext.is_empty() => write!(f, "<no extension>"),
            Self::Unsupported(ext) => write!(f, "{ext} (unsupported)"),
        }
    }
}

/// Reads a document from disk and extracts its page blocks.
///
/// The format check happens before any I/O, so an unsupported extension
/// fails even if the file does not exist. The source file is never modified.
pub fn extract_pages(path: impl AsRef<Path>) -> Result<DocumentPages> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path);
    if let DocumentFormat::Unsupported(ref extension) = format {
        return Err(TermlintError::UnsupportedFormat {
            extension: extension.clone(),
        });
    }

    let bytes = std::fs::read(path)?;
    let pages = format.extract_bytes(&bytes)?;
    debug!(
        path = %path.display(),
        %format,
        pages = pages.len(),
        "extracted document text"
    );
    Ok(pages)
}

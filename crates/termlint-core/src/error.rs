use thiserror::Error;

/// Errors that can occur during rule-based terminology analysis.
#[derive(Debug, Error)]
pub enum TermlintError {
    /// The document extension is not one of the recognized formats.
    #[error("unsupported document format {extension:?}: must be .docx or .pdf")]
    UnsupportedFormat {
        /// Lower-cased extension without the leading dot (empty if absent).
        extension: String,
    },

    /// A tabular source lacks columns the loader cannot do without.
    #[error("missing required column(s): {}", columns.join(", "))]
    MissingColumns {
        /// Names of the absent columns, in header order.
        columns: Vec<String>,
    },

    /// The document container could not be decoded at all.
    #[error("failed to extract text from {format} document: {reason}")]
    Extraction {
        /// Human-readable format name (`docx`, `pdf`).
        format: &'static str,
        /// Underlying decoder message.
        reason: String,
    },

    /// A word-boundary pattern failed to compile.
    #[error("pattern compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// CSV reading or writing failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying file system failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TermlintError {
    pub(crate) fn extraction(format: &'static str, reason: impl ToString) -> Self {
        Self::Extraction {
            format,
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for termlint core operations.
pub type Result<T> = std::result::Result<T, TermlintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = TermlintError::UnsupportedFormat {
            extension: "txt".into(),
        };
        assert!(err.to_string().contains("\"txt\""));

        let err = TermlintError::MissingColumns {
            columns: vec!["approved_term".into(), "synonyms".into()],
        };
        assert_eq!(
            err.to_string(),
            "missing required column(s): approved_term, synonyms"
        );

        let err = TermlintError::extraction("pdf", "bad xref");
        assert!(err.to_string().contains("pdf"));
        assert!(err.to_string().contains("bad xref"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TermlintError>();
    }
}

//! # Sentence Segmenter
//!
//! Splits a page block into sentence-like units on terminal punctuation
//! and newlines. Segmentation is purely syntactic: abbreviations, decimal
//! points and quotes are not special-cased.

use std::iter::FusedIterator;

/// Characters that end a sentence candidate.
pub const SENTENCE_TERMINATORS: &[char] = &['.', '?', '!', ';', '\n'];

/// Lazy iterator over the trimmed, non-empty sentences of a text block.
///
/// Cloning the iterator restarts from the clone point; calling
/// [`split_sentences`] again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let rest = self.rest?;
            let (candidate, tail) = match rest.find(SENTENCE_TERMINATORS) {
                Some(idx) => {
                    let width = rest[idx..].chars().next().map_or(1, char::len_utf8);
                    (&rest[..idx], Some(&rest[idx + width..]))
                }
                None => (rest, None),
            };
            self.rest = tail;

            let trimmed = candidate.trim();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
    }
}

impl FusedIterator for Sentences<'_> {}

/// Splits `text` into trimmed sentence candidates, dropping empty ones.
///
/// # Examples
/// ```
/// use termlint_core::segment::split_sentences;
///
/// let sentences: Vec<_> = split_sentences("Танк стояв поруч. Хто там?\n").collect();
/// assert_eq!(sentences, vec!["Танк стояв поруч", "Хто там"]);
/// ```
#[must_use]
pub fn split_sentences(text: &str) -> Sentences<'_> {
    Sentences { rest: Some(text) }
}

/// Stateless segmenter handle, for callers that prefer a value to a function.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceSegmenter;

impl SentenceSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// See [`split_sentences`].
    pub fn segment<'a>(&self, text: &'a str) -> Sentences<'a> {
        split_sentences(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_every_terminator() {
        let parts: Vec<_> = split_sentences("a. b? c! d; e\nf").collect();
        assert_eq!(parts, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn drops_empty_candidates() {
        let parts: Vec<_> = split_sentences("...\n\n  ;; Текст  ..").collect();
        assert_eq!(parts, vec!["Текст"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(split_sentences("").count(), 0);
        assert_eq!(split_sentences("   \t").count(), 0);
    }

    #[test]
    fn no_abbreviation_awareness() {
        let parts: Vec<_> = split_sentences("Див. ст. 5").collect();
        assert_eq!(parts, vec!["Див", "ст", "5"]);
    }

    #[test]
    fn carriage_returns_are_trimmed() {
        let parts: Vec<_> = split_sentences("перший\r\nдругий\r\n").collect();
        assert_eq!(parts, vec!["перший", "другий"]);
    }

    #[test]
    fn iterator_is_restartable() {
        let sentences = split_sentences("one. two. three");
        let first: Vec<_> = sentences.clone().collect();
        let second: Vec<_> = sentences.collect();
        assert_eq!(first, second);

        let segmenter = SentenceSegmenter::new();
        assert_eq!(segmenter.segment("x. y").count(), 2);
        assert_eq!(segmenter.segment("x. y").count(), 2);
    }
}

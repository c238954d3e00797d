//! Document text extraction — turns uploaded document bytes into one ordered string.
//!
//! Pages are concatenated in document order with no separator. A page that
//! yields no text (scanned image, broken content stream) contributes an empty
//! string; only a document that cannot be opened at all is an error.

use thiserror::Error;

pub mod pdf;

pub use pdf::PdfTextExtractor;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document is empty")]
    Empty,

    #[error("document could not be parsed: {0}")]
    Malformed(String),
}

/// Text of a whole document plus per-page diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
    page_count: usize,
    /// 1-based numbers of pages that contributed no text.
    blank_pages: Vec<usize>,
}

impl ExtractedText {
    /// Joins page texts in order. `None` and `Some("")` both count as blank.
    pub fn from_pages<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut extracted = ExtractedText::default();
        for page in pages {
            extracted.page_count += 1;
            match page {
                Some(text) if !text.is_empty() => extracted.text.push_str(&text),
                _ => extracted.blank_pages.push(extracted.page_count),
            }
        }
        extracted
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn blank_pages(&self) -> &[usize] {
        &self.blank_pages
    }
}

/// Pluggable extraction backend. Implementations are blocking; callers on an
/// async runtime run them via `tokio::task::spawn_blocking`.
pub trait DocumentTextExtractor: Send + Sync {
    fn extract(&self, document: &[u8]) -> Result<ExtractedText, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str) -> Option<String> {
        Some(text.to_string())
    }

    #[test]
    fn test_pages_joined_in_order_without_separator() {
        let extracted = ExtractedText::from_pages(vec![page("Jane Doe\n"), page("Acme"), page("Corp")]);
        assert_eq!(extracted.as_str(), "Jane Doe\nAcmeCorp");
        assert_eq!(extracted.page_count(), 3);
        assert!(extracted.blank_pages().is_empty());
    }

    #[test]
    fn test_missing_pages_become_empty_strings() {
        let extracted = ExtractedText::from_pages(vec![page("first"), None, page(""), page("last")]);
        assert_eq!(extracted.as_str(), "firstlast");
        assert_eq!(extracted.page_count(), 4);
        assert_eq!(extracted.blank_pages(), &[2, 3]);
    }

    #[test]
    fn test_repeated_pages_are_not_deduplicated() {
        let extracted = ExtractedText::from_pages(vec![page("same"), page("same")]);
        assert_eq!(extracted.as_str(), "samesame");
    }

    #[test]
    fn test_no_pages_yields_empty_text() {
        let extracted = ExtractedText::from_pages(Vec::new());
        assert_eq!(extracted.as_str(), "");
        assert_eq!(extracted.page_count(), 0);
    }
}

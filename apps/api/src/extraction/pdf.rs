// PDF text extraction on top of lopdf.
// Pages are read one at a time so a single unreadable page never sinks the document.

use lopdf::Document;
use tracing::{debug, warn};

use crate::extraction::{DocumentTextExtractor, ExtractedText, ExtractionError};

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl DocumentTextExtractor for PdfTextExtractor {
    fn extract(&self, document: &[u8]) -> Result<ExtractedText, ExtractionError> {
        if document.is_empty() {
            return Err(ExtractionError::Empty);
        }

        let pdf =
            Document::load_mem(document).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

        // BTreeMap keyed by 1-based page number, so iteration is document order.
        let pages = pdf.get_pages();
        debug!("Opened PDF with {} pages", pages.len());

        let texts = pages.keys().map(|&number| match pdf.extract_text(&[number]) {
            Ok(text) => Some(strip_block_terminator(text)),
            Err(e) => {
                warn!("Page {number} yielded no text: {e}");
                None
            }
        });

        Ok(ExtractedText::from_pages(texts))
    }
}

/// lopdf closes every text block with a single `'\n'`. Dropping it keeps page
/// texts running together with no boundary marker.
fn strip_block_terminator(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

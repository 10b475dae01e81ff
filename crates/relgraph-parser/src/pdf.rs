//! PDF document parser using pdf-extract
//!
//! Extracts the text of every page in reading order. Anything that is
//! not a decodable PDF is reported as `ParserError::Decode`.

use std::path::Path;

use crate::{ParserError, Result};

/// Every PDF starts with this marker (possibly after a few junk bytes)
const PDF_MAGIC: &[u8] = b"%PDF-";

/// How far into the payload the header may appear
const HEADER_SEARCH_WINDOW: usize = 1024;

/// PDF document parser
pub struct PdfParser {
    /// Separator placed between page texts
    pub page_separator: String,
}

impl PdfParser {
    /// Create a new PDF parser with default settings
    pub fn new() -> Self {
        Self {
            page_separator: "\n".to_string(),
        }
    }

    /// Use a different page separator
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    /// Extract text from a PDF file on disk
    pub fn extract_text_from_path(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| ParserError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        self.extract_text(&bytes)
    }

    /// Extract text from an in-memory PDF, pages joined by the separator
    pub fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let pages = self.page_texts(bytes)?;
        Ok(pages.join(&self.page_separator))
    }

    /// Extract the text of each page, in page order
    pub fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>> {
        if !has_pdf_header(bytes) {
            return Err(ParserError::Decode(
                "payload does not start with a PDF header".to_string(),
            ));
        }

        // The decoder panics on some malformed streams instead of erroring.
        let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|_| ParserError::Decode("PDF decoder aborted on malformed input".to_string()))?
            .map_err(|e| ParserError::Decode(e.to_string()))?;

        tracing::debug!(pages = pages.len(), bytes = bytes.len(), "Extracted PDF text");

        Ok(pages)
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window
        .windows(PDF_MAGIC.len())
        .any(|w| w == PDF_MAGIC)
}

//! PDF text extraction.
//!
//! The handler only needs "path in, text out", so extraction sits behind the
//! [`TextExtractor`] trait. [`PdfTextExtractor`] is the oxidize-pdf backed
//! implementation used in production.

use crate::error::{ExtractionError, ExtractionResult};
use oxidize_pdf::parser::PdfReader;
use std::path::Path;
use tracing::debug;

/// Something that can turn a file on disk into plain text.
///
/// Implementations are blocking and are run off the async runtime by callers.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> ExtractionResult<String>;
}

/// Extracts text from every page of a PDF with oxidize-pdf.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, path: &Path) -> ExtractionResult<String> {
        let document = PdfReader::open_document(path)
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        let pages = document
            .extract_text()
            .map_err(|e| ExtractionError::Extract(e.to_string()))?;

        debug!("Extracted text from {} page(s) of {}", pages.len(), path.display());

        Ok(join_pages(pages.iter().map(|page| page.text.as_str())))
    }
}

/// Every page's text followed by a newline, including the last one.
fn join_pages<'a>(pages: impl IntoIterator<Item = &'a str>) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}

//! PDF text extraction using the `pdf-extract` crate.
//!
//! Pages are extracted individually and concatenated in page order with no
//! separator added, so page N+1 text directly follows page N text.

use std::panic::{self, AssertUnwindSafe};

use crate::document::{Document, DocumentSource};
use crate::input::error::{InputError, InputResult};

/// PDF extractor backed by `pdf-extract`.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Extract one string per page, in page order.
    ///
    /// `pdf-extract` panics on some malformed inputs instead of returning an
    /// error, so the call runs behind `catch_unwind`.
    pub fn pages(&self, data: &[u8]) -> InputResult<Vec<String>> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(data)
        }));
        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(InputError::Pdf {
                message: e.to_string(),
            }),
            Err(_) => Err(InputError::PdfPanicked),
        }
    }

    /// Extract the whole document as one text.
    pub fn extract(&self, data: &[u8], name: &str) -> InputResult<Document> {
        let pages = self.pages(data)?;
        let document = document_from_pages(pages, name);
        tracing::info!(
            name,
            pages = page_count(&document),
            chars = document.text().len(),
            "pdf extracted"
        );
        Ok(document)
    }
}

/// Concatenate page texts in order.
pub(crate) fn document_from_pages(pages: Vec<String>, name: &str) -> Document {
    let page_count = pages.len();
    Document::new(
        pages.concat(),
        DocumentSource::Pdf {
            name: name.to_string(),
            pages: page_count,
        },
    )
}

fn page_count(document: &Document) -> usize {
    match document.source() {
        DocumentSource::Pdf { pages, .. } => *pages,
        _ => 0,
    }
}

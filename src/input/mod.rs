//! Input acquisition: turn an upload or typed text into a [`Document`].
//!
//! A PDF upload is extracted page by page; any other file is read as text;
//! typed text is used verbatim.

pub mod error;
pub mod pdf;

use std::path::Path;

use crate::document::{Document, DocumentSource};

pub use error::{InputError, InputResult};
pub use pdf::PdfExtractor;

/// Kind of file accepted by the upload control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Text,
}

/// Detect the upload kind from a file name.
pub fn detect_kind(path: &Path) -> UploadKind {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => UploadKind::Pdf,
        _ => UploadKind::Text,
    }
}

/// Extract a document from uploaded PDF bytes.
pub fn from_pdf_bytes(data: &[u8], name: &str) -> InputResult<Document> {
    PdfExtractor.extract(data, name)
}

/// Wrap typed text.
pub fn typed(text: impl Into<String>) -> Document {
    Document::typed(text)
}

/// Load a file from disk: PDFs are extracted, anything else is read as text.
pub fn load_file(path: &Path) -> InputResult<Document> {
    let data = std::fs::read(path).map_err(|e| InputError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match detect_kind(path) {
        UploadKind::Pdf => from_pdf_bytes(&data, &name),
        UploadKind::Text => {
            let text = String::from_utf8_lossy(&data).into_owned();
            tracing::debug!(name = %name, bytes = data.len(), "text file loaded");
            Ok(Document::new(text, DocumentSource::TextFile { name }))
        }
    }
}

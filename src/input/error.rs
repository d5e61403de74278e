//! Rich diagnostic error types for input acquisition.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from reading or extracting the input document.
#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("PDF extraction failed: {message}")]
    #[diagnostic(
        code(pagebrief::input::pdf),
        help(
            "The upload could not be read as a PDF. Verify the file is a valid PDF \
             and not corrupted or encrypted."
        )
    )]
    Pdf { message: String },

    #[error("PDF extraction aborted on a malformed document")]
    #[diagnostic(
        code(pagebrief::input::pdf_panicked),
        help(
            "The PDF library could not handle this file's structure. \
             Try re-saving the document with another PDF tool."
        )
    )]
    PdfPanicked,

    #[error("failed to read \"{path}\"")]
    #[diagnostic(
        code(pagebrief::input::io),
        help("Check that the file exists and you have read permissions.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for input acquisition results.
pub type InputResult<T> = std::result::Result<T, InputError>;

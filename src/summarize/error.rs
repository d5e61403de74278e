//! Rich diagnostic error types for the summarization backends.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from a summarization backend.
#[derive(Debug, Error, Diagnostic)]
pub enum SummarizeError {
    #[error("summarization request to {url} failed: {message}")]
    #[diagnostic(
        code(pagebrief::summarize::request),
        help(
            "The model endpoint could not be reached. Check the network and the \
             `[summarizer]` endpoint in the config file."
        )
    )]
    Request { url: String, message: String },

    #[error("model rejected the request (HTTP {status}): {message}")]
    #[diagnostic(
        code(pagebrief::summarize::rejected),
        help(
            "The model refused the input. Very long inputs exceed the model's context \
             window; shorten the text or summarize it in parts. A 401/403 means the API \
             token is missing or invalid."
        )
    )]
    Rejected { status: u16, message: String },

    #[error("failed to parse model response: {message}")]
    #[diagnostic(
        code(pagebrief::summarize::parse),
        help("The model returned an unexpected response format.")
    )]
    Parse { message: String },

    #[error("model returned an empty summary")]
    #[diagnostic(
        code(pagebrief::summarize::empty),
        help("Try a different length profile or check the model's input limits.")
    )]
    EmptySummary,
}

/// Convenience alias for summarization results.
pub type SummarizeResult<T> = std::result::Result<T, SummarizeError>;

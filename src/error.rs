//! Top-level error type for pagebrief.
//!
//! Each subsystem defines its own error enum with miette `#[diagnostic]`
//! derives; `BriefError` wraps them so the binary can report any of them
//! with its code and help text intact.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::input::InputError;
use crate::paths::PathError;
use crate::pipeline::PipelineError;
use crate::summarize::SummarizeError;
use crate::wordcloud::WordCloudError;

#[derive(Debug, Error, Diagnostic)]
pub enum BriefError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Summarize(#[from] SummarizeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    WordCloud(#[from] WordCloudError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Paths(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),

    #[error("terminal I/O failed")]
    #[diagnostic(
        code(pagebrief::tui::io),
        help("The terminal could not be drawn to. Run from an interactive terminal.")
    )]
    Terminal(#[source] std::io::Error),
}

/// Convenience alias for top-level results.
pub type BriefResult<T> = std::result::Result<T, BriefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_code() {
        let err: BriefError = SummarizeError::EmptySummary.into();
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("pagebrief::summarize::empty")
        );

        let err: BriefError = PipelineError::MissingInput.into();
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("pagebrief::pipeline::missing_input")
        );
    }
}

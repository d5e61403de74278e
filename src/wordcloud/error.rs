//! Rich diagnostic error types for the word-cloud renderer.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from rendering or exporting a word cloud.
#[derive(Debug, Error, Diagnostic)]
pub enum WordCloudError {
    #[error("no words left to plot after removing stop words and numbers")]
    #[diagnostic(
        code(pagebrief::wordcloud::no_words),
        help("The keyword phrases contained only numbers or stop words.")
    )]
    NoWords,

    #[error("failed to load font \"{path}\": {message}")]
    #[diagnostic(
        code(pagebrief::wordcloud::font),
        help(
            "Point `[wordcloud] font_path` at a TrueType (.ttf) file, or remove the \
             setting to use a system font."
        )
    )]
    Font { path: String, message: String },

    #[error("failed to encode word cloud image: {message}")]
    #[diagnostic(code(pagebrief::wordcloud::encode))]
    Encode { message: String },

    #[error("failed to write word cloud to \"{path}\"")]
    #[diagnostic(
        code(pagebrief::wordcloud::io),
        help("Check that the output directory exists and is writable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for word-cloud results.
pub type WordCloudResult<T> = std::result::Result<T, WordCloudError>;

//! Processing pipeline: summarize, rank keywords, render the word cloud.
//!
//! The three stages run sequentially on one [`Document`] with no feedback
//! between them. Any stage failure aborts the run; no partial results are
//! returned. [`Session`] wraps the pipeline in the Idle → Processing →
//! Resulted state machine the presentation layer observes.

pub mod session;

use miette::Diagnostic;
use thiserror::Error;

use crate::config::AppConfig;
use crate::document::Document;
use crate::keywords::{KeywordExtractor, KeywordList, RakeExtractor};
use crate::message::{Notice, NoticeSink};
use crate::summarize::{self, Summarizer, SummarizeError, Summary, SummaryLengthProfile};
use crate::wordcloud::{WordCloudError, WordCloudImage, WordCloudRenderer};

pub use session::{RunOutcome, Session, SessionState, StateObserver};

/// Warning shown when Summarize is pressed without any text.
pub const MISSING_INPUT: &str = "Please enter or upload some text.";
/// Shown once the model has answered.
pub const SUMMARY_DONE: &str = "Summary generated!";
/// Shown when RAKE finds no candidate phrases.
pub const NO_KEYWORDS: &str = "No significant keywords found.";
/// Shown after a PDF upload was read.
pub const PDF_EXTRACTED: &str = "Text extracted successfully!";

/// Errors that abort a pipeline run.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error("no input text")]
    #[diagnostic(
        code(pagebrief::pipeline::missing_input),
        help("Type some text or upload a PDF before summarizing.")
    )]
    MissingInput,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Summarize(#[from] SummarizeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    WordCloud(#[from] WordCloudError),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Built-in pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Summarize,
    Keywords,
    WordCloud,
}

impl StageKind {
    /// Busy-indicator text while the stage runs.
    pub fn progress_text(&self) -> &'static str {
        match self {
            Self::Summarize => "Generating summary...",
            Self::Keywords => "Extracting keywords...",
            Self::WordCloud => "Generating word cloud...",
        }
    }
}

/// Results of one completed run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub summary: Summary,
    pub keywords: KeywordList,
    /// `None` exactly when `keywords` is empty.
    pub cloud: Option<WordCloudImage>,
}

/// The three adapters, wired together.
pub struct Pipeline {
    summarizer: Box<dyn Summarizer>,
    keywords: Box<dyn KeywordExtractor>,
    renderer: WordCloudRenderer,
}

impl Pipeline {
    pub fn new(
        summarizer: Box<dyn Summarizer>,
        keywords: Box<dyn KeywordExtractor>,
        renderer: WordCloudRenderer,
    ) -> Self {
        Self {
            summarizer,
            keywords,
            renderer,
        }
    }

    /// Pipeline with the configured backend, RAKE and the configured font.
    pub fn from_config(config: &AppConfig) -> PipelineResult<Self> {
        let summarizer = summarize::build_summarizer(&config.summarizer, &config.ollama);
        let renderer = WordCloudRenderer::new(config.wordcloud.clone())?;
        tracing::debug!(
            backend = summarizer.name(),
            face = renderer.face_name(),
            "pipeline ready"
        );
        Ok(Self::new(summarizer, Box::new(RakeExtractor::new()), renderer))
    }

    pub fn summarizer_name(&self) -> &str {
        self.summarizer.name()
    }

    /// Run all three stages on `document`.
    pub fn run(
        &self,
        document: &Document,
        profile: SummaryLengthProfile,
        sink: &dyn NoticeSink,
    ) -> PipelineResult<Analysis> {
        if document.is_blank() {
            return Err(PipelineError::MissingInput);
        }

        sink.emit(&Notice::progress(StageKind::Summarize.progress_text()));
        let summary = summarize::summarize_document(self.summarizer.as_ref(), document, profile)?;
        sink.emit(&Notice::toast(SUMMARY_DONE));

        sink.emit(&Notice::progress(StageKind::Keywords.progress_text()));
        let keywords = self.keywords.extract(document.text());

        let cloud = if keywords.is_empty() {
            sink.emit(&Notice::info(NO_KEYWORDS));
            None
        } else {
            sink.emit(&Notice::progress(StageKind::WordCloud.progress_text()));
            self.renderer.render(&keywords)?
        };

        tracing::info!(
            profile = %profile,
            summary_words = summary.stats().words,
            keywords = keywords.len(),
            cloud = cloud.is_some(),
            "run completed"
        );

        Ok(Analysis {
            summary,
            keywords,
            cloud,
        })
    }
}

//! Summarization adapter: forwards text and a length profile to a pretrained
//! model and returns its single best summary.
//!
//! The model runs behind the [`Summarizer`] trait. Two HTTP backends exist:
//! a Hugging Face inference endpoint (default, `facebook/bart-large-cnn`)
//! and a local Ollama server. Length bounds are passed through untouched;
//! the model may not honour them exactly.

pub mod error;
pub mod huggingface;
pub mod ollama;

use serde::{Deserialize, Serialize};

use crate::document::{Document, TextStats};

pub use error::{SummarizeError, SummarizeResult};
pub use huggingface::HuggingFaceSummarizer;
pub use ollama::{OllamaConfig, OllamaSummarizer};

/// One of the three summary length choices offered to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryLengthProfile {
    #[default]
    Short,
    Medium,
    Long,
}

/// Model length bounds (tokens, not words) for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    pub max_length: u32,
    pub min_length: u32,
}

impl SummaryLengthProfile {
    /// All profiles in selector order.
    pub const ALL: [Self; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Label shown in the selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Short => "Short (3 lines)",
            Self::Medium => "Medium",
            Self::Long => "Long",
        }
    }

    /// Fixed lookup table of (max, min) bounds.
    pub fn bounds(&self) -> LengthBounds {
        let (max_length, min_length) = match self {
            Self::Short => (60, 30),
            Self::Medium => (120, 60),
            Self::Long => (200, 80),
        };
        LengthBounds {
            max_length,
            min_length,
        }
    }

    /// Next profile in selector order, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            Self::Short => Self::Medium,
            Self::Medium => Self::Long,
            Self::Long => Self::Short,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl std::fmt::Display for SummaryLengthProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for SummaryLengthProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| lower == p.key() || lower == p.label().to_lowercase())
            .ok_or_else(|| format!("unknown summary length \"{s}\" (expected short, medium or long)"))
    }
}

/// A generated summary. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    text: String,
    profile: SummaryLengthProfile,
}

impl Summary {
    pub fn new(text: impl Into<String>, profile: SummaryLengthProfile) -> Self {
        Self {
            text: text.into(),
            profile,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn profile(&self) -> SummaryLengthProfile {
        self.profile
    }

    pub fn stats(&self) -> TextStats {
        TextStats::of(&self.text)
    }
}

/// A pretrained summarization model.
pub trait Summarizer {
    /// Backend name for logs and the status bar.
    fn name(&self) -> &str;

    /// Run the model once with sampling disabled and return its best summary.
    fn summarize(&self, text: &str, bounds: LengthBounds) -> SummarizeResult<String>;
}

/// Summarize a document with the bounds of `profile`. One model call, no retry.
pub fn summarize_document(
    summarizer: &dyn Summarizer,
    document: &Document,
    profile: SummaryLengthProfile,
) -> SummarizeResult<Summary> {
    let bounds = profile.bounds();
    tracing::info!(
        backend = summarizer.name(),
        max_length = bounds.max_length,
        min_length = bounds.min_length,
        "generating summary"
    );
    let text = summarizer.summarize(document.text(), bounds)?;
    if text.trim().is_empty() {
        return Err(SummarizeError::EmptySummary);
    }
    Ok(Summary::new(text, profile))
}

/// Which model backend to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    #[default]
    HuggingFace,
    Ollama,
}

/// `[summarizer]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Inference endpoint for the Hugging Face backend.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://router.huggingface.co/hf-inference/models/facebook/bart-large-cnn".into()
}
fn default_token_env() -> String {
    "HF_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            endpoint: default_endpoint(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Build the configured backend.
pub fn build_summarizer(
    config: &SummarizerConfig,
    ollama: &OllamaConfig,
) -> Box<dyn Summarizer> {
    match config.backend {
        Backend::HuggingFace => {
            let token = std::env::var(&config.token_env)
                .ok()
                .filter(|t| !t.trim().is_empty());
            if token.is_none() {
                tracing::debug!(
                    env = %config.token_env,
                    "no API token set, calling the endpoint anonymously"
                );
            }
            Box::new(HuggingFaceSummarizer::new(
                &config.endpoint,
                token,
                config.timeout_secs,
            ))
        }
        Backend::Ollama => Box::new(OllamaSummarizer::new(ollama.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recording {
        reply: String,
        calls: RefCell<Vec<LengthBounds>>,
    }

    impl Summarizer for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn summarize(&self, _text: &str, bounds: LengthBounds) -> SummarizeResult<String> {
            self.calls.borrow_mut().push(bounds);
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn profile_table() {
        let pairs: Vec<(u32, u32)> = SummaryLengthProfile::ALL
            .iter()
            .map(|p| (p.bounds().max_length, p.bounds().min_length))
            .collect();
        assert_eq!(pairs, vec![(60, 30), (120, 60), (200, 80)]);
    }

    #[test]
    fn profile_labels_and_parsing() {
        assert_eq!(SummaryLengthProfile::Short.label(), "Short (3 lines)");
        assert_eq!(
            "Short (3 lines)".parse::<SummaryLengthProfile>().unwrap(),
            SummaryLengthProfile::Short
        );
        assert_eq!(
            "medium".parse::<SummaryLengthProfile>().unwrap(),
            SummaryLengthProfile::Medium
        );
        assert_eq!(
            "LONG".parse::<SummaryLengthProfile>().unwrap(),
            SummaryLengthProfile::Long
        );
        assert!("tiny".parse::<SummaryLengthProfile>().is_err());
        for near_miss in ["shortest", "longish", "medium-ish", "short (3"] {
            assert!(near_miss.parse::<SummaryLengthProfile>().is_err(), "{near_miss}");
        }
    }

    #[test]
    fn profile_cycles() {
        let p = SummaryLengthProfile::Short;
        assert_eq!(p.next().next().next(), p);
    }

    #[test]
    fn every_profile_yields_a_summary() {
        let doc = Document::typed("Ferris the crab maintains the Rust compiler.");
        for profile in SummaryLengthProfile::ALL {
            let model = Recording {
                reply: "Ferris maintains rustc.".into(),
                calls: RefCell::new(Vec::new()),
            };
            let summary = summarize_document(&model, &doc, profile).unwrap();
            assert!(!summary.text().is_empty());
            assert_eq!(model.calls.borrow().as_slice(), &[profile.bounds()]);
        }
    }

    #[test]
    fn blank_model_output_is_an_error() {
        let model = Recording {
            reply: "  \n".into(),
            calls: RefCell::new(Vec::new()),
        };
        let doc = Document::typed("Some text.");
        let err = summarize_document(&model, &doc, SummaryLengthProfile::Long).unwrap_err();
        assert!(matches!(err, SummarizeError::EmptySummary));
    }

    #[test]
    fn summary_stats() {
        let summary = Summary::new("Two words", SummaryLengthProfile::Medium);
        assert_eq!(summary.stats().words, 2);
        assert_eq!(summary.stats().chars, 9);
    }

    #[test]
    fn backend_names_are_kebab_case() {
        let json = serde_json::to_string(&Backend::HuggingFace).unwrap();
        assert_eq!(json, "\"hugging-face\"");
    }
}

//! Structured user-facing notices.
//!
//! `Notice` replaces raw `println!()` calls for the status lines the user
//! sees (success, warning, info, error, busy indicators, toasts). Sinks
//! decide how to render them: styled terminal text, newline-delimited JSON,
//! in-memory collection for tests, or the TUI status area.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

// ── Notice types ────────────────────────────────────────────────────────

/// A notice emitted by the pipeline or the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notice {
    /// Step completed (e.g. "Summary generated!").
    Success { text: String },
    /// Recoverable user mistake; nothing was run.
    Warning { text: String },
    /// Neutral information (e.g. "No significant keywords found.").
    Info { text: String },
    /// A failed run.
    Error {
        code: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        help: Option<String>,
    },
    /// Busy indicator shown while a blocking step runs.
    Progress { text: String },
    /// Short-lived confirmation (e.g. a saved file).
    Toast { text: String },
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::Warning { text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::Info { text: text.into() }
    }

    pub fn progress(text: impl Into<String>) -> Self {
        Self::Progress { text: text.into() }
    }

    pub fn toast(text: impl Into<String>) -> Self {
        Self::Toast { text: text.into() }
    }

    /// Error notice built from a diagnostic, carrying its code and help.
    pub fn from_diagnostic(err: &dyn miette::Diagnostic) -> Self {
        Self::Error {
            code: err
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "pagebrief::error".into()),
            message: err.to_string(),
            help: err.help().map(|h| h.to_string()),
        }
    }

    /// The main line of text, whatever the kind.
    pub fn text(&self) -> &str {
        match self {
            Self::Success { text }
            | Self::Warning { text }
            | Self::Info { text }
            | Self::Progress { text }
            | Self::Toast { text } => text,
            Self::Error { message, .. } => message,
        }
    }
}

// ── NoticeSink trait ────────────────────────────────────────────────────

/// A destination for notices.
pub trait NoticeSink {
    /// Emit a single notice.
    fn emit(&self, notice: &Notice);
}

// ── StdoutSink ──────────────────────────────────────────────────────────

/// Renders notices as tagged terminal lines; errors and warnings go to stderr.
pub struct StdoutSink;

impl NoticeSink for StdoutSink {
    fn emit(&self, notice: &Notice) {
        match notice {
            Notice::Success { text } => println!("[ok] {text}"),
            Notice::Warning { text } => eprintln!("[warning] {text}"),
            Notice::Info { text } => println!("[info] {text}"),
            Notice::Progress { text } => eprintln!("{text}"),
            Notice::Toast { text } => println!("{text}"),
            Notice::Error {
                code,
                message,
                help,
            } => {
                eprintln!("[error:{code}] {message}");
                if let Some(h) = help {
                    eprintln!("  help: {h}");
                }
            }
        }
    }
}

// ── JsonSink ────────────────────────────────────────────────────────────

/// Emits notices as newline-delimited JSON on stderr, keeping stdout for
/// the result document.
pub struct JsonSink;

impl NoticeSink for JsonSink {
    fn emit(&self, notice: &Notice) {
        if let Ok(json) = serde_json::to_string(notice) {
            eprintln!("{json}");
        }
    }
}

// ── VecSink ─────────────────────────────────────────────────────────────

/// Collects notices in memory.
#[derive(Default)]
pub struct VecSink {
    notices: Mutex<Vec<Notice>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected notices.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a notice with exactly this text was emitted.
    pub fn contains_text(&self, text: &str) -> bool {
        self.notices().iter().any(|n| n.text() == text)
    }
}

impl NoticeSink for VecSink {
    fn emit(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_notices() {
        let sink = VecSink::new();
        sink.emit(&Notice::success("Summary generated!"));
        sink.emit(&Notice::info("No significant keywords found."));
        assert_eq!(sink.len(), 2);
        assert!(sink.contains_text("Summary generated!"));
    }

    #[test]
    fn notice_serializes_with_type_tag() {
        let json = serde_json::to_string(&Notice::warning("Please enter or upload some text."))
            .unwrap();
        assert!(json.contains("\"type\":\"Warning\""));
        assert!(json.contains("Please enter or upload some text."));
    }

    #[test]
    fn notice_deserializes_from_json() {
        let json = r#"{"type":"Toast","text":"saved"}"#;
        let notice: Notice = serde_json::from_str(json).unwrap();
        assert_eq!(notice, Notice::toast("saved"));
    }

    #[test]
    fn error_from_diagnostic_keeps_code_and_help() {
        let err = crate::summarize::SummarizeError::EmptySummary;
        let notice = Notice::from_diagnostic(&err);
        match notice {
            Notice::Error { code, help, .. } => {
                assert_eq!(code, "pagebrief::summarize::empty");
                assert!(help.is_some());
            }
            other => panic!("expected error notice, got {other:?}"),
        }
    }
}

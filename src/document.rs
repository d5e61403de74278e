//! The text under analysis and its derived counts.

use serde::{Deserialize, Serialize};

/// Where a document's text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentSource {
    /// Typed into the text field (or piped on stdin).
    Typed,
    /// Extracted from an uploaded PDF.
    Pdf { name: String, pages: usize },
    /// Read from a plain-text file.
    TextFile { name: String },
}

impl std::fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Typed => write!(f, "(typed)"),
            Self::Pdf { name, pages } => write!(f, "pdf:{name} ({pages} pages)"),
            Self::TextFile { name } => write!(f, "file:{name}"),
        }
    }
}

/// Word and character counts shown next to a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    /// Whitespace-separated tokens.
    pub words: usize,
    /// Unicode scalar values.
    pub chars: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
        }
    }
}

impl std::fmt::Display for TextStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Word Count: {} | Character Count: {}", self.words, self.chars)
    }
}

/// Raw text under analysis. Immutable for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    text: String,
    source: DocumentSource,
}

impl Document {
    pub fn new(text: impl Into<String>, source: DocumentSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    /// A document typed by the user, taken verbatim.
    pub fn typed(text: impl Into<String>) -> Self {
        Self::new(text, DocumentSource::Typed)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    /// Empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Counts for display; `None` for blank text so callers suppress them.
    pub fn stats(&self) -> Option<TextStats> {
        (!self.is_blank()).then(|| TextStats::of(&self.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_words_and_chars() {
        let doc = Document::typed("Rust is  fast.\nVery fast.");
        let stats = doc.stats().unwrap();
        assert_eq!(stats.words, 5);
        assert_eq!(stats.chars, 25);
    }

    #[test]
    fn stats_line_format() {
        let stats = Document::typed("Ferris writes Rust.").stats().unwrap();
        assert_eq!(
            format!("Input {stats}"),
            "Input Word Count: 3 | Character Count: 19"
        );
    }

    #[test]
    fn chars_are_unicode_scalars() {
        assert_eq!(TextStats::of("naïve café").chars, 10);
    }

    #[test]
    fn blank_text_suppresses_stats() {
        for text in ["", "   ", "\n\t  \n"] {
            let doc = Document::typed(text);
            assert!(doc.is_blank());
            assert!(doc.stats().is_none());
        }
    }

    #[test]
    fn typed_text_is_verbatim() {
        let doc = Document::typed("  leading and trailing  ");
        assert_eq!(doc.text(), "  leading and trailing  ");
        assert_eq!(doc.source(), &DocumentSource::Typed);
    }

    #[test]
    fn source_display() {
        let src = DocumentSource::Pdf {
            name: "report.pdf".into(),
            pages: 2,
        };
        assert_eq!(src.to_string(), "pdf:report.pdf (2 pages)");
    }
}

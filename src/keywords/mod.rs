//! Keyword extraction adapter.
//!
//! Ranking is delegated to RAKE (the `rake` crate) with the NLTK English stop
//! words; this module only lowercases the input, orders ties
//! deterministically and keeps the top [`KEYWORD_LIMIT`] phrases.

pub mod stopwords;

use std::cmp::Ordering;

use rake::{Rake, StopWords};
use serde::{Deserialize, Serialize};

/// Most phrases ever shown or fed to the word cloud.
pub const KEYWORD_LIMIT: usize = 10;

/// One ranked phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub phrase: String,
    pub score: f64,
}

/// Ranked phrases, most relevant first, at most [`KEYWORD_LIMIT`] long.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordList(Vec<Keyword>);

impl KeywordList {
    /// Keep the first [`KEYWORD_LIMIT`] entries of an already ranked sequence.
    pub fn from_ranked(ranked: impl IntoIterator<Item = Keyword>) -> Self {
        Self(ranked.into_iter().take(KEYWORD_LIMIT).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyword> {
        self.0.iter()
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|k| k.phrase.as_str())
    }

    /// All phrases joined with single spaces (the word-cloud input).
    pub fn joined(&self) -> String {
        self.phrases().collect::<Vec<_>>().join(" ")
    }
}

impl<'a> IntoIterator for &'a KeywordList {
    type Item = &'a Keyword;
    type IntoIter = std::slice::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A keyword/phrase ranking algorithm.
pub trait KeywordExtractor {
    /// Rank phrases of `text`, most relevant first, at most [`KEYWORD_LIMIT`].
    fn extract(&self, text: &str) -> KeywordList;
}

/// RAKE with the NLTK English stop words.
pub struct RakeExtractor {
    rake: Rake,
}

impl RakeExtractor {
    pub fn new() -> Self {
        let mut stop_words = StopWords::new();
        for word in stopwords::ENGLISH {
            stop_words.insert((*word).to_string());
        }
        Self {
            rake: Rake::new(stop_words),
        }
    }
}

impl Default for RakeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor for RakeExtractor {
    fn extract(&self, text: &str) -> KeywordList {
        let mut scored = self.rake.run(&text.to_lowercase());
        // Equal scores come back in hash order; break ties by phrase.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });

        let keywords = KeywordList::from_ranked(scored.into_iter().map(|k| Keyword {
            phrase: k.keyword,
            score: k.score,
        }));
        tracing::debug!(count = keywords.len(), "keywords ranked");
        keywords
    }
}

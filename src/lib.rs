// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # pagebrief
//!
//! Summarize typed text or a PDF: a model-generated summary, the top RAKE
//! keyword phrases and a word-cloud image, produced in one synchronous run.
//!
//! ## Architecture
//!
//! - **Input** (`input`): PDF page-by-page extraction, text files, typed text
//! - **Summarization** (`summarize`): Hugging Face inference or local Ollama
//! - **Keywords** (`keywords`): RAKE over the NLTK English stop words
//! - **Word cloud** (`wordcloud`): seeded 800×400 raster layout
//! - **Pipeline** (`pipeline`): the stages plus the session state machine
//! - **Presentation** (`message`, `tui`): notices and the terminal UI
//!
//! ## Library usage
//!
//! ```no_run
//! use pagebrief::config::AppConfig;
//! use pagebrief::document::Document;
//! use pagebrief::message::StdoutSink;
//! use pagebrief::pipeline::{Pipeline, Session};
//! use pagebrief::summarize::SummaryLengthProfile;
//!
//! let pipeline = Pipeline::from_config(&AppConfig::default()).unwrap();
//! let mut session = Session::new();
//! session.set_document(Document::typed("Rust is a systems programming language."));
//! session.summarize(&pipeline, SummaryLengthProfile::Short, &StdoutSink);
//! ```

pub mod animation;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod input;
pub mod keywords;
pub mod message;
pub mod paths;
pub mod pipeline;
pub mod summarize;
pub mod tui;
pub mod wordcloud;

//! Export of run results: the summary download and JSON result documents.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::TextStats;
use crate::keywords::Keyword;
use crate::message::{Notice, NoticeSink};
use crate::pipeline::Analysis;
use crate::summarize::Summary;
use crate::wordcloud::PlacedWord;

/// File name offered by the download action.
pub const SUMMARY_FILE_NAME: &str = "summary.txt";
/// MIME type of the download.
pub const SUMMARY_MIME: &str = "text/plain";
/// File name of the saved word cloud.
pub const WORDCLOUD_FILE_NAME: &str = "wordcloud.png";

/// Errors from writing exported files.
#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("failed to write {path}")]
    #[diagnostic(
        code(pagebrief::export::write),
        help("Check that the output directory exists and is writable, or pass --out-dir.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// The "download summary" payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDownload {
    pub file_name: &'static str,
    pub mime: &'static str,
    /// Exactly the bytes of the displayed summary.
    pub content: Vec<u8>,
}

impl SummaryDownload {
    pub fn of(summary: &Summary) -> Self {
        Self {
            file_name: SUMMARY_FILE_NAME,
            mime: SUMMARY_MIME,
            content: summary.text().as_bytes().to_vec(),
        }
    }

    /// Write into `dir` under [`SUMMARY_FILE_NAME`]; returns the full path.
    pub fn write_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        let path = dir.join(self.file_name);
        std::fs::write(&path, &self.content).map_err(|e| ExportError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::info!(path = %path.display(), bytes = self.content.len(), "summary saved");
        Ok(path)
    }
}

/// Ranked keyword with its 1-based position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordExport {
    pub rank: usize,
    pub phrase: String,
    pub score: f64,
}

/// Word-cloud layout, without the raster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCloudExport {
    pub width: u32,
    pub height: u32,
    pub words: Vec<PlacedWord>,
    /// Where the PNG was written, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// A completed run, for `--json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisExport {
    pub profile: String,
    pub summary: String,
    pub summary_stats: TextStats,
    pub keywords: Vec<KeywordExport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordcloud: Option<WordCloudExport>,
}

impl AnalysisExport {
    pub fn from_analysis(analysis: &Analysis, cloud_file: Option<PathBuf>) -> Self {
        Self {
            profile: analysis.summary.profile().label().to_string(),
            summary: analysis.summary.text().to_string(),
            summary_stats: analysis.summary.stats(),
            keywords: keyword_exports(analysis.keywords.iter()),
            wordcloud: analysis.cloud.as_ref().map(|cloud| WordCloudExport {
                width: cloud.width(),
                height: cloud.height(),
                words: cloud.words().to_vec(),
                file: cloud_file,
            }),
        }
    }
}

/// Files a finished run was asked to write. Nothing is written by default.
#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    /// PNG path for the word cloud.
    pub cloud: Option<PathBuf>,
    /// Directory for [`SUMMARY_FILE_NAME`].
    pub summary_dir: Option<PathBuf>,
}

/// Paths that were actually written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedFiles {
    pub cloud: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

/// Write the requested files.
///
/// A failed write is reported as a warning and the remaining files are
/// still attempted; the analysis itself is untouched.
pub fn save_requested(
    analysis: &Analysis,
    request: &SaveRequest,
    sink: &dyn NoticeSink,
) -> SavedFiles {
    let mut saved = SavedFiles::default();

    if let (Some(path), Some(cloud)) = (&request.cloud, &analysis.cloud) {
        match cloud.save_png(path) {
            Ok(()) => {
                sink.emit(&Notice::toast(format!("Saved {}", path.display())));
                saved.cloud = Some(path.clone());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "word cloud not saved");
                sink.emit(&Notice::warning(format!("Word cloud not saved: {e}")));
            }
        }
    }

    if let Some(dir) = &request.summary_dir {
        match SummaryDownload::of(&analysis.summary).write_to(dir) {
            Ok(path) => {
                sink.emit(&Notice::toast(format!("Saved {}", path.display())));
                saved.summary = Some(path);
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "summary not saved");
                sink.emit(&Notice::warning(format!("Summary not saved: {e}")));
            }
        }
    }

    saved
}

/// Number keywords from 1 in rank order.
pub fn keyword_exports<'a>(keywords: impl Iterator<Item = &'a Keyword>) -> Vec<KeywordExport> {
    keywords
        .enumerate()
        .map(|(i, k)| KeywordExport {
            rank: i + 1,
            phrase: k.phrase.clone(),
            score: k.score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::KeywordList;
    use crate::message::VecSink;
    use crate::summarize::SummaryLengthProfile;
    use crate::wordcloud::{BitmapFace, WordCloudConfig, WordCloudRenderer};

    fn analysis_with_cloud() -> Analysis {
        let keywords = KeywordList::from_ranked([
            Keyword {
                phrase: "memory safety".into(),
                score: 4.0,
            },
            Keyword {
                phrase: "borrow checker".into(),
                score: 4.0,
            },
        ]);
        let renderer =
            WordCloudRenderer::with_face(WordCloudConfig::default(), Box::new(BitmapFace));
        let cloud = renderer.render(&keywords).unwrap();
        assert!(cloud.is_some());
        Analysis {
            summary: Summary::new("Rust is memory safe.", SummaryLengthProfile::Short),
            keywords,
            cloud,
        }
    }

    #[test]
    fn download_is_exact_summary_bytes() {
        let summary = Summary::new("Ferris é un granchio.\n", SummaryLengthProfile::Short);
        let download = SummaryDownload::of(&summary);
        assert_eq!(download.file_name, "summary.txt");
        assert_eq!(download.mime, "text/plain");
        assert_eq!(download.content, summary.text().as_bytes());

        let dir = tempfile::TempDir::new().unwrap();
        let path = download.write_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("summary.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), summary.text().as_bytes());
    }

    #[test]
    fn write_to_missing_dir_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let download = SummaryDownload::of(&Summary::new("x", SummaryLengthProfile::Short));
        let err = download.write_to(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }

    #[test]
    fn analysis_export_numbers_keywords() {
        let analysis = Analysis {
            summary: Summary::new("Short.", SummaryLengthProfile::Medium),
            keywords: KeywordList::from_ranked([
                Keyword {
                    phrase: "memory safety".into(),
                    score: 4.0,
                },
                Keyword {
                    phrase: "crates".into(),
                    score: 1.0,
                },
            ]),
            cloud: None,
        };
        let export = AnalysisExport::from_analysis(&analysis, None);
        assert_eq!(export.profile, "Medium");
        assert_eq!(export.keywords[1].rank, 2);
        assert_eq!(export.keywords[1].phrase, "crates");

        let json = serde_json::to_string(&export).unwrap();
        assert!(!json.contains("wordcloud"));
    }

    #[test]
    fn nothing_is_written_unless_requested() {
        let analysis = analysis_with_cloud();
        let sink = VecSink::new();
        let saved = save_requested(&analysis, &SaveRequest::default(), &sink);
        assert_eq!(saved, SavedFiles::default());
        assert!(sink.is_empty());
    }

    #[test]
    fn failed_cloud_write_warns_and_keeps_going() {
        let dir = tempfile::TempDir::new().unwrap();
        let analysis = analysis_with_cloud();
        let sink = VecSink::new();
        let request = SaveRequest {
            cloud: Some(dir.path().join("absent").join("wordcloud.png")),
            summary_dir: Some(dir.path().to_path_buf()),
        };

        let saved = save_requested(&analysis, &request, &sink);
        assert_eq!(saved.cloud, None);
        assert_eq!(saved.summary, Some(dir.path().join(SUMMARY_FILE_NAME)));
        assert!(sink.notices().iter().any(|n| {
            matches!(n, Notice::Warning { .. }) && n.text().starts_with("Word cloud not saved")
        }));
        assert_eq!(analysis.summary.text(), "Rust is memory safe.");
    }

    #[test]
    fn requested_cloud_is_saved_as_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(WORDCLOUD_FILE_NAME);
        let sink = VecSink::new();
        let request = SaveRequest {
            cloud: Some(path.clone()),
            summary_dir: None,
        };
        let saved = save_requested(&analysis_with_cloud(), &request, &sink);
        assert_eq!(saved.cloud, Some(path.clone()));
        assert!(std::fs::read(&path).unwrap().starts_with(b"\x89PNG"));
    }
}

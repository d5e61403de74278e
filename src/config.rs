//! Application configuration, persisted as TOML.
//!
//! Every section is optional in the file; missing keys fall back to the
//! defaults of the subsystem that owns them.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::AnimationConfig;
use crate::summarize::SummarizerConfig;
use crate::summarize::ollama::OllamaConfig;
use crate::wordcloud::WordCloudConfig;

/// Errors from loading or saving the config file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(pagebrief::config::read),
        help("Ensure the config file exists and is readable, or run `pagebrief config init`.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(pagebrief::config::parse),
        help("Check the TOML syntax. `pagebrief config show` prints the effective defaults.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(pagebrief::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Where exported files (`summary.txt`, `wordcloud.png`) are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub wordcloud: WordCloudConfig,
    #[serde(default)]
    pub animations: AnimationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content, path)
    }

    /// Load from a TOML file, using defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn from_toml(content: &str, path: &Path) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: "(in-memory)".into(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::Backend;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml("", Path::new("empty.toml")).unwrap();
        assert_eq!(config.summarizer.backend, Backend::HuggingFace);
        assert_eq!(config.wordcloud.seed, 42);
        assert!(config.animations.enabled);
        assert_eq!(config.output.dir, PathBuf::from("."));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let toml = r#"
            [summarizer]
            backend = "ollama"

            [ollama]
            model = "mistral"

            [animations]
            enabled = false
        "#;
        let config = AppConfig::from_toml(toml, Path::new("partial.toml")).unwrap();
        assert_eq!(config.summarizer.backend, Backend::Ollama);
        assert_eq!(config.summarizer.timeout_secs, 120);
        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert!(!config.animations.enabled);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = AppConfig::from_toml("[summarizer", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.wordcloud.seed = 7;
        config.output.dir = PathBuf::from("/tmp/briefs");
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.wordcloud.seed, 7);
        assert_eq!(loaded.output.dir, PathBuf::from("/tmp/briefs"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.summarizer.backend, Backend::HuggingFace);
    }
}

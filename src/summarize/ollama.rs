//! Ollama backend: summarize with a local instruction-tuned model.
//!
//! Ollama has no dedicated summarization endpoint, so the length bounds are
//! phrased in the prompt and `max_length` caps `num_predict`. Temperature 0
//! and a fixed seed keep the output deterministic.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::summarize::error::{SummarizeError, SummarizeResult};
use crate::summarize::{LengthBounds, Summarizer};

/// `[ollama]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name to use.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "llama3.2".into()
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Client for the Ollama `/api/generate` endpoint.
pub struct OllamaSummarizer {
    config: OllamaConfig,
    agent: ureq::Agent,
}

impl OllamaSummarizer {
    pub fn new(config: OllamaConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, agent }
    }

    fn prompt(text: &str, bounds: LengthBounds) -> String {
        format!(
            "Summarize the following text in roughly {} to {} tokens. \
             Reply with the summary only.\n\n{text}",
            bounds.min_length, bounds.max_length
        )
    }

    /// JSON request body for one call.
    pub fn request_body(&self, text: &str, bounds: LengthBounds) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "prompt": Self::prompt(text, bounds),
            "stream": false,
            "options": {
                "num_predict": bounds.max_length,
                "temperature": 0,
                "seed": 0,
            },
        })
    }
}

impl Summarizer for OllamaSummarizer {
    fn name(&self) -> &str {
        "ollama"
    }

    fn summarize(&self, text: &str, bounds: LengthBounds) -> SummarizeResult<String> {
        let url = format!("{}/api/generate", self.config.base_url);

        let resp = match self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(self.request_body(text, bounds))
        {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                let message = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|json| json["error"].as_str().map(|s| s.to_string()))
                    .unwrap_or(body);
                return Err(SummarizeError::Rejected { status, message });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(SummarizeError::Request {
                    url,
                    message: transport.to_string(),
                });
            }
        };

        let json: serde_json::Value = resp.into_json().map_err(|e| SummarizeError::Parse {
            message: e.to_string(),
        })?;

        json["response"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| SummarizeError::Parse {
                message: "missing 'response' field".into(),
            })
    }
}

//! Hugging Face inference endpoint backend.
//!
//! Sends the text with `max_length`/`min_length` parameters and sampling
//! disabled, and reads back `[{"summary_text": "..."}]`.

use std::time::Duration;

use crate::summarize::error::{SummarizeError, SummarizeResult};
use crate::summarize::{LengthBounds, Summarizer};

/// Longest error body echoed back to the user.
const MAX_ERROR_PREVIEW: usize = 500;

/// Client for a hosted summarization model.
pub struct HuggingFaceSummarizer {
    endpoint: String,
    token: Option<String>,
    agent: ureq::Agent,
}

impl HuggingFaceSummarizer {
    pub fn new(endpoint: &str, token: Option<String>, timeout_secs: u64) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .build();
        Self {
            endpoint: endpoint.to_string(),
            token,
            agent,
        }
    }

    /// JSON request body for one call.
    pub fn request_body(text: &str, bounds: LengthBounds) -> serde_json::Value {
        serde_json::json!({
            "inputs": text,
            "parameters": {
                "max_length": bounds.max_length,
                "min_length": bounds.min_length,
                "do_sample": false,
            },
            "options": {
                "wait_for_model": true,
            },
        })
    }
}

impl Summarizer for HuggingFaceSummarizer {
    fn name(&self) -> &str {
        "hugging-face"
    }

    fn summarize(&self, text: &str, bounds: LengthBounds) -> SummarizeResult<String> {
        let mut request = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json");
        if let Some(ref token) = self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = match request.send_json(Self::request_body(text, bounds)) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(SummarizeError::Rejected {
                    status,
                    message: error_message(&body),
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(SummarizeError::Request {
                    url: self.endpoint.clone(),
                    message: transport.to_string(),
                });
            }
        };

        let body = response.into_string().map_err(|e| SummarizeError::Parse {
            message: e.to_string(),
        })?;
        parse_summary(&body)
    }
}

/// Pull `summary_text` out of either the list or the single-object form.
pub fn parse_summary(body: &str) -> SummarizeResult<String> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SummarizeError::Parse {
            message: e.to_string(),
        })?;

    let entry = match &json {
        serde_json::Value::Array(items) => items.first(),
        obj @ serde_json::Value::Object(_) => Some(obj),
        _ => None,
    };

    entry
        .and_then(|e| e["summary_text"].as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| SummarizeError::Parse {
            message: "missing 'summary_text' field".into(),
        })
}

/// The model's `{"error": ...}` message, or a preview of the raw body.
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = json["error"].as_str() {
            return msg.to_string();
        }
    }
    if body.chars().count() > MAX_ERROR_PREVIEW {
        let preview: String = body.chars().take(MAX_ERROR_PREVIEW).collect();
        format!("{preview}...")
    } else {
        body.to_string()
    }
}

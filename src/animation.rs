//! Decorative Lottie animations shown next to the result panels.
//!
//! The three payloads are fetched once at start-up and handed to the
//! presentation layer as an [`AnimationSet`]. Any failure (non-200,
//! transport, undecodable JSON) yields `None` for that slot and is only
//! logged; animations never block or fail a run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Braille spinner cycled through while an animation is "playing".
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// `[animations]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Fetch animations at start-up.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_summary_url")]
    pub summary_url: String,
    #[serde(default = "default_keywords_url")]
    pub keywords_url: String,
    #[serde(default = "default_wordcloud_url")]
    pub wordcloud_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}
fn default_summary_url() -> String {
    "https://assets2.lottiefiles.com/packages/lf20_9cyyl8i4.json".into()
}
fn default_keywords_url() -> String {
    "https://assets2.lottiefiles.com/packages/lf20_mjlh3hcy.json".into()
}
fn default_wordcloud_url() -> String {
    "https://assets1.lottiefiles.com/packages/lf20_pwohahvd.json".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            summary_url: default_summary_url(),
            keywords_url: default_keywords_url(),
            wordcloud_url: default_wordcloud_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Lottie document as it appears on the wire; only the header fields.
#[derive(Debug, Deserialize)]
struct LottieHeader {
    #[serde(default)]
    nm: Option<String>,
    fr: f64,
    ip: f64,
    op: f64,
    w: u32,
    h: u32,
    #[serde(default)]
    layers: Vec<serde_json::Value>,
}

/// Decoded Lottie metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Animation {
    pub name: Option<String>,
    pub frame_rate: f64,
    pub in_point: f64,
    pub out_point: f64,
    pub width: u32,
    pub height: u32,
    pub layers: usize,
}

impl Animation {
    /// Parse a Lottie JSON document.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let header: LottieHeader = serde_json::from_str(body)?;
        Ok(Self {
            name: header.nm,
            frame_rate: header.fr,
            in_point: header.ip,
            out_point: header.op,
            width: header.w,
            height: header.h,
            layers: header.layers.len(),
        })
    }

    /// Frame shown `elapsed` after the animation started, looping.
    pub fn frame_at(&self, elapsed: Duration) -> u64 {
        let frames = (self.out_point - self.in_point).max(0.0) as u64;
        if frames == 0 || self.frame_rate <= 0.0 {
            return self.in_point.max(0.0) as u64;
        }
        let played = (elapsed.as_secs_f64() * self.frame_rate) as u64;
        self.in_point.max(0.0) as u64 + played % frames
    }

    /// Terminal stand-in for the vector animation.
    pub fn spinner(&self, elapsed: Duration) -> char {
        SPINNER[(self.frame_at(elapsed) % SPINNER.len() as u64) as usize]
    }
}

/// Fetch and decode one Lottie animation. `None` on any failure.
pub fn load_lottie_url(agent: &ureq::Agent, url: &str) -> Option<Animation> {
    let response = match agent.get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => {
            tracing::debug!(url, status, "animation not available");
            return None;
        }
        Err(ureq::Error::Transport(transport)) => {
            tracing::debug!(url, error = %transport, "animation fetch failed");
            return None;
        }
    };
    if response.status() != 200 {
        tracing::debug!(url, status = response.status(), "animation not available");
        return None;
    }

    let body = match response.into_string() {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(url, error = %e, "animation body unreadable");
            return None;
        }
    };
    match Animation::from_json(&body) {
        Ok(animation) => Some(animation),
        Err(e) => {
            tracing::warn!(url, error = %e, "animation payload is not valid Lottie");
            None
        }
    }
}

/// The three decorative animations, any of which may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationSet {
    pub summary: Option<Animation>,
    pub keywords: Option<Animation>,
    pub wordcloud: Option<Animation>,
}

impl AnimationSet {
    /// No animations at all (offline mode, or disabled in config).
    pub fn none() -> Self {
        Self::default()
    }

    /// Fetch all three payloads, or none when disabled.
    pub fn fetch(config: &AnimationConfig) -> Self {
        if !config.enabled {
            tracing::debug!("animations disabled");
            return Self::none();
        }
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        let set = Self {
            summary: load_lottie_url(&agent, &config.summary_url),
            keywords: load_lottie_url(&agent, &config.keywords_url),
            wordcloud: load_lottie_url(&agent, &config.wordcloud_url),
        };
        tracing::info!(loaded = set.loaded(), "animations fetched");
        set
    }

    /// How many of the three payloads are present.
    pub fn loaded(&self) -> usize {
        [&self.summary, &self.keywords, &self.wordcloud]
            .iter()
            .filter(|a| a.is_some())
            .count()
    }
}

//! Word-cloud renderer.
//!
//! Takes the ranked keyword phrases, joins them into one text blob and lays
//! the words out on a fixed 800×400 white canvas: words are tokenised, stop
//! words and numbers dropped, frequencies normalised, and each word placed
//! largest first at a random free position (see [`layout`]). Randomness is
//! seeded, so the same phrases always give the same image.

pub mod error;
pub mod font;
pub mod layout;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::keywords::KeywordList;
use crate::keywords::stopwords;

pub use error::{WordCloudError, WordCloudResult};
pub use font::{BitmapFace, GlyphFace, TrueTypeFace, WordMask};
pub use layout::{LayoutParams, OccupancyMap, Placement};

/// Canvas width in pixels.
pub const WIDTH: u32 = 800;
/// Canvas height in pixels.
pub const HEIGHT: u32 = 400;
/// Canvas background (white).
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Viridis colour map, sampled at ten evenly spaced stops.
const VIRIDIS: [[u8; 3]; 10] = [
    [0x44, 0x01, 0x54],
    [0x48, 0x28, 0x78],
    [0x3e, 0x49, 0x89],
    [0x31, 0x68, 0x8e],
    [0x26, 0x82, 0x8e],
    [0x1f, 0x9e, 0x89],
    [0x35, 0xb7, 0x79],
    [0x6e, 0xce, 0x58],
    [0xb5, 0xde, 0x2b],
    [0xfd, 0xe7, 0x25],
];

/// `[wordcloud]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCloudConfig {
    /// TrueType font to draw with; system fonts are probed when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    /// Seed for placement, orientation and colour choices.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Most distinct words drawn.
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    /// Probability that a word is drawn horizontally.
    #[serde(default = "default_prefer_horizontal")]
    pub prefer_horizontal: f64,
    /// How strongly frequency drives font size (0 = rank only, 1 = linear).
    #[serde(default = "default_relative_scaling")]
    pub relative_scaling: f64,
    /// Smallest font size tried before giving up on further words.
    #[serde(default = "default_min_font_size")]
    pub min_font_size: u32,
    /// Free space kept around each word.
    #[serde(default = "default_margin")]
    pub margin: u32,
}

fn default_seed() -> u64 {
    42
}
fn default_max_words() -> usize {
    200
}
fn default_prefer_horizontal() -> f64 {
    0.9
}
fn default_relative_scaling() -> f64 {
    0.5
}
fn default_min_font_size() -> u32 {
    4
}
fn default_margin() -> u32 {
    2
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            seed: default_seed(),
            max_words: default_max_words(),
            prefer_horizontal: default_prefer_horizontal(),
            relative_scaling: default_relative_scaling(),
            min_font_size: default_min_font_size(),
            margin: default_margin(),
        }
    }
}

/// A drawn word, in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub vertical: bool,
    pub color: [u8; 3],
}

/// A rendered word cloud and the layout that produced it.
#[derive(Debug, Clone)]
pub struct WordCloudImage {
    image: RgbImage,
    words: Vec<PlacedWord>,
    source_text: String,
}

impl WordCloudImage {
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn words(&self) -> &[PlacedWord] {
        &self.words
    }

    /// The text blob the cloud was generated from.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> WordCloudResult<Vec<u8>> {
        let mut buf = std::io::Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| WordCloudError::Encode {
                message: e.to_string(),
            })?;
        Ok(buf.into_inner())
    }

    /// Write as a PNG file.
    pub fn save_png(&self, path: &Path) -> WordCloudResult<()> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes).map_err(|e| WordCloudError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w[\w']*").expect("static regex"))
}

/// Normalised word frequencies (highest first, max 1.0), at most `max_words`.
///
/// Possessive `'s` is stripped, numbers and stop words are dropped, and a
/// plural ending in `s` is folded into its singular when both occur.
pub fn word_frequencies(text: &str, max_words: usize) -> Vec<(String, f64)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for m in word_regex().find_iter(text) {
        let mut word = m.as_str().to_lowercase();
        if word.ends_with("'s") {
            word.truncate(word.len() - 2);
        }
        if word.is_empty()
            || word.chars().all(|c| c.is_ascii_digit())
            || stopwords::is_stop_word(&word)
        {
            continue;
        }
        *counts.entry(word).or_default() += 1;
    }

    let plurals: Vec<String> = counts
        .keys()
        .filter(|w| w.ends_with('s') && !w.ends_with("ss") && w.len() > 1)
        .filter(|w| counts.contains_key(&w[..w.len() - 1]))
        .cloned()
        .collect();
    for plural in plurals {
        if let Some(n) = counts.remove(&plural) {
            *counts.entry(plural[..plural.len() - 1].to_string()).or_default() += n;
        }
    }

    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(max_words);

    let Some(max) = sorted.first().map(|(_, n)| *n as f64) else {
        return Vec::new();
    };
    sorted
        .into_iter()
        .map(|(word, n)| (word, n as f64 / max))
        .collect()
}

/// Renders keyword lists into word-cloud images.
pub struct WordCloudRenderer {
    config: WordCloudConfig,
    face: Box<dyn GlyphFace>,
}

impl WordCloudRenderer {
    /// Renderer using the configured or a system font.
    pub fn new(config: WordCloudConfig) -> WordCloudResult<Self> {
        let face = font::load_face(config.font_path.as_deref())?;
        Ok(Self::with_face(config, face))
    }

    pub fn with_face(config: WordCloudConfig, face: Box<dyn GlyphFace>) -> Self {
        Self { config, face }
    }

    pub fn face_name(&self) -> &str {
        self.face.name()
    }

    /// Render the cloud for `keywords`; `None` when there are no keywords.
    pub fn render(&self, keywords: &KeywordList) -> WordCloudResult<Option<WordCloudImage>> {
        if keywords.is_empty() {
            return Ok(None);
        }
        self.generate(&keywords.joined()).map(Some)
    }

    /// Render a cloud from free text.
    pub fn generate(&self, text: &str) -> WordCloudResult<WordCloudImage> {
        let words = word_frequencies(text, self.config.max_words);
        if words.is_empty() {
            return Err(WordCloudError::NoWords);
        }

        let params = LayoutParams {
            width: WIDTH,
            height: HEIGHT,
            max_font_size: HEIGHT,
            min_font_size: self.config.min_font_size.max(1),
            font_step: 1,
            prefer_horizontal: self.config.prefer_horizontal,
            relative_scaling: self.config.relative_scaling,
            margin: self.config.margin,
        };
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let placements = layout::place_words(&words, self.face.as_ref(), &params, &mut rng);

        let mut image = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
        let mut placed = Vec::with_capacity(placements.len());
        for p in placements {
            let color = VIRIDIS[rng.gen_range(0..VIRIDIS.len())];
            blit(&mut image, &p.mask, p.x, p.y, color);
            placed.push(PlacedWord {
                word: p.word,
                font_size: p.font_size,
                x: p.x,
                y: p.y,
                width: p.mask.width,
                height: p.mask.height,
                vertical: p.vertical,
                color,
            });
        }

        tracing::debug!(
            words = words.len(),
            placed = placed.len(),
            face = self.face.name(),
            "word cloud rendered"
        );

        Ok(WordCloudImage {
            image,
            words: placed,
            source_text: text.to_string(),
        })
    }
}

/// Alpha-blend `mask` in `color` onto the image.
fn blit(image: &mut RgbImage, mask: &WordMask, x0: u32, y0: u32, color: [u8; 3]) {
    for my in 0..mask.height {
        for mx in 0..mask.width {
            let alpha = mask.get(mx, my);
            let (x, y) = (x0 + mx, y0 + my);
            if alpha == 0 || x >= image.width() || y >= image.height() {
                continue;
            }
            let a = f32::from(alpha) / 255.0;
            let px = image.get_pixel_mut(x, y);
            for c in 0..3 {
                let bg = f32::from(px.0[c]);
                px.0[c] = (bg + (f32::from(color[c]) - bg) * a).round() as u8;
            }
        }
    }
}

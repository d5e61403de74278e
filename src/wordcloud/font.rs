//! Glyph rasterization for word-cloud words.
//!
//! A [`GlyphFace`] turns a word at a pixel size into a coverage mask. The
//! TrueType face uses `rusttype`; the bitmap face scales the `font8x8` glyphs
//! and needs no font file, so a cloud can always be drawn.

use std::path::{Path, PathBuf};

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use rusttype::{Font, Scale, point};

use crate::wordcloud::error::{WordCloudError, WordCloudResult};

/// Font files probed when no `font_path` is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// 8-bit coverage of a rendered word, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMask {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

impl WordMask {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: vec![0; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y * self.width + x) as usize]
    }

    fn raise(&mut self, x: u32, y: u32, value: u8) {
        let idx = (y * self.width + x) as usize;
        self.coverage[idx] = self.coverage[idx].max(value);
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Rotate 90° counter-clockwise (vertical words read bottom to top).
    pub fn rotated(&self) -> Self {
        let mut out = Self::blank(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                let v = self.get(x, y);
                if v > 0 {
                    out.raise(y, self.width - 1 - x, v);
                }
            }
        }
        out
    }
}

/// Something that can draw a word at a given pixel size.
pub trait GlyphFace {
    fn name(&self) -> &str;
    fn rasterize(&self, text: &str, size: u32) -> WordMask;
}

/// TrueType font rendered with `rusttype`.
pub struct TrueTypeFace {
    font: Font<'static>,
    name: String,
}

impl TrueTypeFace {
    pub fn from_file(path: &Path) -> WordCloudResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| WordCloudError::Font {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(bytes, name).ok_or_else(|| WordCloudError::Font {
            path: path.display().to_string(),
            message: "not a TrueType font".into(),
        })
    }

    pub fn from_bytes(bytes: Vec<u8>, name: impl Into<String>) -> Option<Self> {
        Font::try_from_vec(bytes).map(|font| Self {
            font,
            name: name.into(),
        })
    }
}

impl GlyphFace for TrueTypeFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn rasterize(&self, text: &str, size: u32) -> WordMask {
        let scale = Scale::uniform(size as f32);
        let v_metrics = self.font.v_metrics(scale);
        let glyphs: Vec<_> = self
            .font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .collect();

        let width = glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
            .ceil()
            .max(0.0) as u32;
        let height = (v_metrics.ascent - v_metrics.descent).ceil().max(0.0) as u32;

        let mut mask = WordMask::blank(width, height);
        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let x = gx as i32 + bb.min.x;
                let y = gy as i32 + bb.min.y;
                if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                    mask.raise(x as u32, y as u32, (v * 255.0).round() as u8);
                }
            });
        }
        mask
    }
}

/// Scaled 8×8 bitmap glyphs.
pub struct BitmapFace;

impl BitmapFace {
    fn glyph(ch: char) -> [u8; 8] {
        BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .unwrap_or([0; 8])
    }
}

impl GlyphFace for BitmapFace {
    fn name(&self) -> &str {
        "font8x8"
    }

    fn rasterize(&self, text: &str, size: u32) -> WordMask {
        let cell = (size / 8).max(1);
        let glyph_px = 8 * cell;
        let count = text.chars().count() as u32;
        let mut mask = WordMask::blank(count * glyph_px, glyph_px);

        for (i, ch) in text.chars().enumerate() {
            let x0 = i as u32 * glyph_px;
            for (row, bits) in Self::glyph(ch).iter().enumerate() {
                for col in 0..8u32 {
                    // Bit 0 is the leftmost pixel.
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    for dy in 0..cell {
                        for dx in 0..cell {
                            mask.raise(x0 + col * cell + dx, row as u32 * cell + dy, 255);
                        }
                    }
                }
            }
        }
        mask
    }
}

/// Pick a face: the configured font, else a system font, else the bitmap face.
pub fn load_face(font_path: Option<&Path>) -> WordCloudResult<Box<dyn GlyphFace>> {
    if let Some(path) = font_path {
        return Ok(Box::new(TrueTypeFace::from_file(path)?));
    }

    for candidate in SYSTEM_FONTS.iter().map(PathBuf::from) {
        if !candidate.is_file() {
            continue;
        }
        match TrueTypeFace::from_file(&candidate) {
            Ok(face) => {
                tracing::debug!(font = %candidate.display(), "word cloud font");
                return Ok(Box::new(face));
            }
            Err(e) => tracing::debug!(error = %e, "skipping system font"),
        }
    }

    tracing::info!("no TrueType font found, using bitmap glyphs");
    Ok(Box::new(BitmapFace))
}

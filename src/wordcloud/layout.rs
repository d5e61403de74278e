//! Word placement on the canvas.
//!
//! Occupied pixels are tracked in a summed-area table so "is this rectangle
//! free" costs four lookups. A word goes to a position drawn uniformly from
//! all free positions; when none exists the caller tries the other
//! orientation, then a smaller font.

use rand::Rng;

use crate::wordcloud::font::{GlyphFace, WordMask};

/// Summed-area table over occupied canvas pixels.
pub struct OccupancyMap {
    width: u32,
    height: u32,
    occupied: Vec<bool>,
    integral: Vec<u32>,
}

impl OccupancyMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            occupied: vec![false; (width * height) as usize],
            integral: vec![0; ((width + 1) * (height + 1)) as usize],
        }
    }

    fn at(&self, x: u32, y: u32) -> u32 {
        self.integral[(y * (self.width + 1) + x) as usize]
    }

    /// Occupied pixels inside the `w`×`h` rectangle at (`x`, `y`).
    pub fn rect_sum(&self, x: u32, y: u32, w: u32, h: u32) -> u32 {
        self.at(x + w, y + h) + self.at(x, y) - self.at(x + w, y) - self.at(x, y + h)
    }

    pub fn is_free(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        self.rect_sum(x, y, w, h) == 0
    }

    /// Top-left corner of a free `w`×`h` rectangle, chosen uniformly among all.
    pub fn sample_position<R: Rng>(&self, w: u32, h: u32, rng: &mut R) -> Option<(u32, u32)> {
        if w == 0 || h == 0 || w > self.width || h > self.height {
            return None;
        }
        let (max_x, max_y) = (self.width - w, self.height - h);

        let mut hits = 0u64;
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.is_free(x, y, w, h) {
                    hits += 1;
                }
            }
        }
        if hits == 0 {
            return None;
        }

        let mut target = rng.gen_range(0..hits);
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.is_free(x, y, w, h) {
                    if target == 0 {
                        return Some((x, y));
                    }
                    target -= 1;
                }
            }
        }
        None
    }

    /// Mark every inked pixel of `mask` drawn at (`x`, `y`) as occupied.
    pub fn occupy(&mut self, mask: &WordMask, x: u32, y: u32) {
        for my in 0..mask.height {
            for mx in 0..mask.width {
                let (cx, cy) = (x + mx, y + my);
                if mask.get(mx, my) > 0 && cx < self.width && cy < self.height {
                    self.occupied[(cy * self.width + cx) as usize] = true;
                }
            }
        }
        self.rebuild_from(y);
    }

    /// Recompute the table from canvas row `y0` down; rows above are unchanged.
    fn rebuild_from(&mut self, y0: u32) {
        let stride = self.width + 1;
        for y in y0..self.height {
            let mut row_sum = 0u32;
            for x in 0..self.width {
                row_sum += u32::from(self.occupied[(y * self.width + x) as usize]);
                let above = self.integral[(y * stride + x + 1) as usize];
                self.integral[((y + 1) * stride + x + 1) as usize] = above + row_sum;
            }
        }
    }
}

/// Canvas size, font-size range and placement knobs.
#[derive(Debug, Clone)]
pub struct LayoutParams {
    pub width: u32,
    pub height: u32,
    pub max_font_size: u32,
    pub min_font_size: u32,
    pub font_step: u32,
    pub prefer_horizontal: f64,
    pub relative_scaling: f64,
    pub margin: u32,
}

/// A word that found a spot on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub word: String,
    pub font_size: u32,
    pub x: u32,
    pub y: u32,
    pub vertical: bool,
    pub mask: WordMask,
}

/// Place words (normalised frequencies, highest first) until one no longer
/// fits at the minimum font size.
pub fn place_words<R: Rng>(
    words: &[(String, f64)],
    face: &dyn GlyphFace,
    params: &LayoutParams,
    rng: &mut R,
) -> Vec<Placement> {
    let mut occupancy = OccupancyMap::new(params.width, params.height);
    let mut placements = Vec::new();
    let mut font_size = params.max_font_size;
    let mut last_freq = 1.0f64;
    let rs = params.relative_scaling;

    for (word, freq) in words {
        if *freq <= 0.0 {
            continue;
        }
        if rs != 0.0 {
            font_size =
                ((rs * (freq / last_freq) + (1.0 - rs)) * f64::from(font_size)).round() as u32;
        }

        let mut vertical = !rng.gen_bool(params.prefer_horizontal.clamp(0.0, 1.0));
        let mut found = None;

        'sizes: while font_size >= params.min_font_size {
            let upright = face.rasterize(word, font_size);
            if upright.is_empty() {
                break;
            }

            // Largest scale at which some orientation fits the bare canvas.
            let mut fit_ratio = 0.0f64;
            for orientation in orientations(vertical, params.prefer_horizontal) {
                let mask = if orientation { upright.rotated() } else { upright.clone() };
                let (box_w, box_h) = (mask.width + params.margin, mask.height + params.margin);
                if box_w > params.width || box_h > params.height {
                    fit_ratio = fit_ratio.max(f64::min(
                        f64::from(params.width) / f64::from(box_w),
                        f64::from(params.height) / f64::from(box_h),
                    ));
                    continue;
                }
                fit_ratio = 1.0;
                if let Some((x, y)) = occupancy.sample_position(box_w, box_h, rng) {
                    found = Some((x + params.margin / 2, y + params.margin / 2, orientation, mask));
                    break 'sizes;
                }
            }

            // Words wider than the canvas in every orientation jump straight
            // to a size that can fit.
            let next = font_size.saturating_sub(params.font_step);
            font_size = if fit_ratio < 1.0 {
                ((f64::from(font_size) * fit_ratio).floor() as u32).min(next)
            } else {
                next
            };
            vertical = false;
        }

        let Some((x, y, vertical, mask)) = found else {
            // Nothing more fits, even at the minimum size.
            break;
        };
        occupancy.occupy(&mask, x, y);
        placements.push(Placement {
            word: word.clone(),
            font_size,
            x,
            y,
            vertical,
            mask,
        });
        last_freq = *freq;
    }

    placements
}

/// The preferred orientation first, then the other one unless every word
/// must stay horizontal.
fn orientations(vertical: bool, prefer_horizontal: f64) -> Vec<bool> {
    if prefer_horizontal < 1.0 {
        vec![vertical, !vertical]
    } else {
        vec![vertical]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordcloud::font::BitmapFace;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params() -> LayoutParams {
        LayoutParams {
            width: 200,
            height: 100,
            max_font_size: 100,
            min_font_size: 4,
            font_step: 1,
            prefer_horizontal: 0.9,
            relative_scaling: 0.5,
            margin: 2,
        }
    }

    #[test]
    fn integral_counts_occupied_pixels() {
        let mut map = OccupancyMap::new(10, 10);
        let mut mask = WordMask::blank(2, 2);
        mask.coverage = vec![255, 255, 0, 255];
        map.occupy(&mask, 3, 4);

        assert_eq!(map.rect_sum(0, 0, 10, 10), 3);
        assert_eq!(map.rect_sum(3, 4, 1, 1), 1);
        assert_eq!(map.rect_sum(3, 5, 1, 1), 0);
        assert!(map.is_free(0, 0, 3, 10));
        assert!(!map.is_free(2, 3, 3, 3));
    }

    #[test]
    fn sample_position_respects_occupancy() {
        let mut map = OccupancyMap::new(4, 1);
        let mut mask = WordMask::blank(3, 1);
        mask.coverage = vec![255; 3];
        map.occupy(&mask, 0, 0);

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(map.sample_position(1, 1, &mut rng), Some((3, 0)));
        assert_eq!(map.sample_position(2, 1, &mut rng), None);
        assert_eq!(map.sample_position(5, 1, &mut rng), None);
    }

    #[test]
    fn placed_words_do_not_overlap() {
        let words: Vec<(String, f64)> = [("rust", 1.0), ("crab", 0.8), ("cargo", 0.5), ("borrow", 0.3)]
            .iter()
            .map(|(w, f)| (w.to_string(), *f))
            .collect();
        let mut rng = StdRng::seed_from_u64(42);
        let placements = place_words(&words, &BitmapFace, &params(), &mut rng);
        assert!(!placements.is_empty());

        let mut map = OccupancyMap::new(200, 100);
        for p in &placements {
            assert!(p.x + p.mask.width <= 200 && p.y + p.mask.height <= 100);
            for my in 0..p.mask.height {
                for mx in 0..p.mask.width {
                    if p.mask.get(mx, my) > 0 {
                        assert!(map.is_free(p.x + mx, p.y + my, 1, 1), "overlap at {}", p.word);
                    }
                }
            }
            map.occupy(&p.mask, p.x, p.y);
        }
    }

    #[test]
    fn first_word_is_largest() {
        let words = vec![("alpha".to_string(), 1.0), ("beta".to_string(), 0.25)];
        let mut rng = StdRng::seed_from_u64(3);
        let placements = place_words(&words, &BitmapFace, &params(), &mut rng);
        assert_eq!(placements.len(), 2);
        assert!(placements[0].font_size >= placements[1].font_size);
    }

    #[test]
    fn crowded_canvas_stops_at_first_unplaceable_word() {
        let words: Vec<(String, f64)> = (0..20).map(|i| (format!("w{i:02}"), 1.0)).collect();
        let tiny = LayoutParams {
            width: 40,
            height: 20,
            max_font_size: 20,
            ..params()
        };
        let placements = place_words(&words, &BitmapFace, &tiny, &mut StdRng::seed_from_u64(42));

        assert!(!placements.is_empty());
        assert!(placements.len() < words.len());
        for (placed, (word, _)) in placements.iter().zip(&words) {
            assert_eq!(&placed.word, word);
            assert!(placed.font_size >= tiny.min_font_size);
            assert!(placed.x + placed.mask.width <= 40 && placed.y + placed.mask.height <= 20);
        }
    }

    #[test]
    fn narrow_canvas_places_word_vertically() {
        // "ab" at size 8 is 16x8: too wide for the canvas, fits once rotated.
        let tall = LayoutParams {
            width: 12,
            height: 40,
            max_font_size: 8,
            ..params()
        };
        let words = vec![("ab".to_string(), 1.0)];
        for seed in 0..8 {
            let placements = place_words(&words, &BitmapFace, &tall, &mut StdRng::seed_from_u64(seed));
            assert_eq!(placements.len(), 1);
            assert!(placements[0].vertical);
            assert_eq!(placements[0].font_size, 8);
            assert_eq!((placements[0].mask.width, placements[0].mask.height), (8, 16));
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let words = vec![("determinism".to_string(), 1.0), ("seed".to_string(), 0.5)];
        let a = place_words(&words, &BitmapFace, &params(), &mut StdRng::seed_from_u64(9));
        let b = place_words(&words, &BitmapFace, &params(), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}

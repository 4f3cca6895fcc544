//! Text measurement and painting
//!
//! [`FontText`] rasterizes through fontdue with a glyph cache keyed by
//! `(char, size bits)`. [`BlockText`] needs no font file: fixed advances and
//! solid glyph boxes, used headless and when no system font is found.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings, Metrics};

use super::frame::Frame;
use crate::error::{GridError, Result};

/// Measures and paints single-line text
pub trait TextRenderer {
    /// Advance width of `text` at `size` pixels
    fn measure(&self, text: &str, size: f32) -> f32;

    /// Paint `text` with its baseline at `baseline`, starting at `x`.
    /// Clipping is the frame's.
    fn draw(&mut self, frame: &mut Frame, x: f32, baseline: f32, text: &str, size: f32, color: u32);
}

pub type GlyphCacheKey = (char, u32);

pub type GlyphCache = HashMap<GlyphCacheKey, (Metrics, Vec<u8>)>;

/// Candidate system fonts, tried in order by [`FontText::discover`]
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

pub struct FontText {
    font: Font,
    glyph_cache: GlyphCache,
}

impl FontText {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| GridError::Other(format!("Failed to load font: {}", e)))?;
        Ok(Self {
            font,
            glyph_cache: HashMap::new(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// First loadable font from the usual system locations
    pub fn discover() -> Option<Self> {
        SYSTEM_FONTS
            .iter()
            .map(PathBuf::from)
            .filter(|p| p.exists())
            .find_map(|p| match Self::load(&p) {
                Ok(text) => {
                    tracing::info!("Using font {}", p.display());
                    Some(text)
                }
                Err(e) => {
                    tracing::debug!("Skipping font {}: {}", p.display(), e);
                    None
                }
            })
    }

    /// Get the number of cached glyphs
    pub fn glyph_cache_size(&self) -> usize {
        self.glyph_cache.len()
    }
}

impl TextRenderer for FontText {
    fn measure(&self, text: &str, size: f32) -> f32 {
        text.chars()
            .map(|ch| match self.glyph_cache.get(&(ch, size.to_bits())) {
                Some((metrics, _)) => metrics.advance_width,
                None => self.font.metrics(ch, size).advance_width,
            })
            .sum()
    }

    fn draw(&mut self, frame: &mut Frame, x: f32, baseline: f32, text: &str, size: f32, color: u32) {
        let mut current_x = x;

        for ch in text.chars() {
            let key = (ch, size.to_bits());
            let font = &self.font;
            let (metrics, bitmap) = self
                .glyph_cache
                .entry(key)
                .or_insert_with(|| font.rasterize(ch, size));

            let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;

            for bitmap_y in 0..metrics.height {
                for bitmap_x in 0..metrics.width {
                    let Some(&alpha) = bitmap.get(bitmap_y * metrics.width + bitmap_x) else {
                        continue;
                    };
                    if alpha == 0 {
                        continue;
                    }
                    let px = current_x as isize + bitmap_x as isize + metrics.xmin as isize;
                    let py = (glyph_top + bitmap_y as f32) as isize;
                    frame.blend_pixel(px, py, color, alpha as f32 / 255.0);
                }
            }

            current_x += metrics.advance_width;
        }
    }
}

/// Font-free text: every glyph advances `0.6 * size` and non-space glyphs
/// paint as a solid box between baseline and x-height
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockText;

impl BlockText {
    const ADVANCE: f32 = 0.6;
    const GLYPH_HEIGHT: f32 = 0.6;
}

impl TextRenderer for BlockText {
    fn measure(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * Self::ADVANCE
    }

    fn draw(&mut self, frame: &mut Frame, x: f32, baseline: f32, text: &str, size: f32, color: u32) {
        let advance = size * Self::ADVANCE;
        let glyph_w = (advance * 0.7).max(1.0);
        let glyph_h = (size * Self::GLYPH_HEIGHT).max(1.0);
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = x + i as f32 * advance;
            let top = baseline - glyph_h;
            for py in top as isize..baseline as isize {
                for px in left as isize..(left + glyph_w) as isize {
                    frame.blend_pixel(px, py, color, 1.0);
                }
            }
        }
    }
}

/// Pick the text backend: an explicit font path, else a system font, else
/// [`BlockText`]
pub fn text_renderer_for(font_path: Option<&str>) -> Box<dyn TextRenderer> {
    if let Some(path) = font_path {
        match FontText::load(Path::new(path)) {
            Ok(text) => return Box::new(text),
            Err(e) => tracing::warn!("Could not load font {}: {}", path, e),
        }
    }
    match FontText::discover() {
        Some(text) => Box::new(text),
        None => {
            tracing::warn!("No usable font found, falling back to block glyphs");
            Box::new(BlockText)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Rect;

    #[test]
    fn test_block_measure_is_linear() {
        let t = BlockText;
        assert_eq!(t.measure("", 10.0), 0.0);
        assert_eq!(t.measure("abcd", 10.0), 24.0);
        assert_eq!(t.measure("ab", 20.0), 24.0);
    }

    #[test]
    fn test_block_draw_paints_inside_clip_only() {
        let mut buf = vec![0xFFFFFFFFu32; 40 * 20];
        let mut frame = Frame::new(&mut buf, 40, 20);
        frame.set_clip(Rect::new(0.0, 0.0, 10.0, 20.0));
        let mut t = BlockText;
        t.draw(&mut frame, 2.0, 15.0, "WWWW", 10.0, 0xFF000000);
        assert_eq!(frame.pixel(3, 12), 0xFF000000);
        // Second glyph starts at x=8 and is cut at the clip edge
        assert_eq!(frame.pixel(9, 12), 0xFF000000);
        assert_eq!(frame.pixel(15, 12), 0xFFFFFFFF);
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        assert!(FontText::load(Path::new("/definitely/not/a/font.ttf")).is_err());
        assert!(FontText::from_bytes(b"not a font").is_err());
    }
}

//! Pixel buffer drawing for grid layers
//!
//! Every layer is an ARGB `u32` buffer (0xAARRGGBB). The base layer is
//! opaque; overlay layers start fully transparent and are composited onto
//! the base with [`composite_over`].

use crate::grid::Rect;

/// Source-over blend of `fg` onto an opaque `bg`; the result is opaque
#[inline]
pub fn blend_colors(bg: u32, fg: u32, alpha: f32) -> u32 {
    let mix = |shift: u32| {
        let b = ((bg >> shift) & 0xFF) as f32;
        let f = ((fg >> shift) & 0xFF) as f32;
        ((b + (f - b) * alpha) as u32).min(0xFF) << shift
    };
    0xFF00_0000 | mix(16) | mix(8) | mix(0)
}

#[inline]
pub fn alpha_of(color: u32) -> f32 {
    (color >> 24) as f32 / 255.0
}

/// Composite an overlay layer onto `dst` in place
pub fn composite_over(dst: &mut [u32], overlay: &[u32]) {
    for (d, &o) in dst.iter_mut().zip(overlay) {
        match o >> 24 {
            0 => {}
            0xFF => *d = o,
            a => *d = blend_colors(*d, o, a as f32 / 255.0),
        }
    }
}

/// Half-open pixel span `[x0, x1) × [y0, y1)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl Span {
    fn of(rect: Rect) -> Self {
        let px = |v: f32| v.max(0.0) as usize;
        Self {
            x0: px(rect.x),
            y0: px(rect.y),
            x1: px(rect.right()),
            y1: px(rect.bottom()),
        }
    }

    fn intersect(self, other: Span) -> Span {
        Span {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// Drawing surface over one layer buffer.
///
/// Painting is confined to the current clip, which starts as the whole
/// buffer. Coordinates outside the buffer are dropped silently.
pub struct Frame<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
    clip: Span,
}

impl<'a> Frame<'a> {
    /// Wrap `buffer` as a `width`-wide surface. A buffer shorter than
    /// `width * height` yields fewer rows.
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        let height = if width == 0 {
            height
        } else {
            height.min(buffer.len() / width)
        };
        let full = Span {
            x0: 0,
            y0: 0,
            x1: width,
            y1: height,
        };
        Self {
            buffer,
            width,
            height,
            clip: full,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    fn full(&self) -> Span {
        Span {
            x0: 0,
            y0: 0,
            x1: self.width,
            y1: self.height,
        }
    }

    /// Restrict painting to `rect` (within the buffer)
    pub fn set_clip(&mut self, rect: Rect) {
        self.clip = Span::of(rect).intersect(self.full());
    }

    pub fn clear_clip(&mut self) {
        self.clip = self.full();
    }

    /// Fill the whole buffer, clip or not
    #[inline]
    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Overwrite the pixels under `rect`; alpha is stored as given
    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        let span = Span::of(rect).intersect(self.clip);
        if span.is_empty() {
            return;
        }
        for y in span.y0..span.y1 {
            let row = y * self.width;
            self.buffer[row + span.x0..row + span.x1].fill(color);
        }
    }

    /// Border of `thickness` pixels along the inside of `rect`
    pub fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: u32) {
        if thickness <= 0.0 || rect.is_empty() {
            return;
        }
        let t = thickness.min(rect.width).min(rect.height);
        let edges = [
            Rect::new(rect.x, rect.y, rect.width, t),
            Rect::new(rect.x, rect.bottom() - t, rect.width, t),
            Rect::new(rect.x, rect.y, t, rect.height),
            Rect::new(rect.right() - t, rect.y, t, rect.height),
        ];
        for edge in edges {
            self.fill_rect(edge, color);
        }
    }

    /// Pixel at (x, y), or 0 outside the buffer
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.buffer[y * self.width + x]
        } else {
            0
        }
    }

    /// Paint one glyph sample with `coverage` in 0.0..=1.0.
    ///
    /// On a transparent pixel the coverage becomes the stored alpha, so text
    /// on overlay layers composites correctly later.
    #[inline]
    pub fn blend_pixel(&mut self, x: isize, y: isize, color: u32, coverage: f32) {
        if x < 0 || y < 0 || !self.clip.contains(x as usize, y as usize) {
            return;
        }
        let alpha = coverage * alpha_of(color);
        if alpha <= 0.0 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        let dst = self.buffer[idx];
        self.buffer[idx] = if dst >> 24 == 0 {
            (((alpha.min(1.0) * 255.0) as u32) << 24) | (color & 0x00FF_FFFF)
        } else if alpha >= 1.0 {
            color | 0xFF00_0000
        } else {
            blend_colors(dst, color, alpha)
        };
    }
}

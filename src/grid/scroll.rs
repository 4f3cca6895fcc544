//! Scroll offsets, bounds and scrollbar geometry
//!
//! Offsets are content-space pixels, always clamped to
//! `[0, max(0, content - viewport)]` on both axes. A scrollbar track exists
//! only while its axis can scroll.

use super::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// An in-progress thumb drag, anchored at the pointer-down position
#[derive(Debug, Clone, Copy, PartialEq)]
struct ThumbDrag {
    axis: Axis,
    start_pointer: f32,
    start_scroll: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollModel {
    x: f64,
    y: f64,
    content_width: f64,
    content_height: f64,
    /// Data area in surface coordinates (excludes header, gutter, scrollbars)
    data_rect: Rect,
    thickness: f32,
    min_thumb: f32,
    drag: Option<ThumbDrag>,
}

impl ScrollModel {
    pub fn new(thickness: f32, min_thumb: f32) -> Self {
        Self {
            thickness,
            min_thumb,
            ..Self::default()
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    /// Update content and viewport extents, re-clamping offsets
    pub fn set_extent(&mut self, content_width: f64, content_height: f64, data_rect: Rect) {
        self.content_width = content_width.max(0.0);
        self.content_height = content_height.max(0.0);
        self.data_rect = data_rect;
        self.clamp();
    }

    pub fn viewport_width(&self) -> f64 {
        self.data_rect.width.max(0.0) as f64
    }

    pub fn viewport_height(&self) -> f64 {
        self.data_rect.height.max(0.0) as f64
    }

    pub fn max_x(&self) -> f64 {
        (self.content_width - self.viewport_width()).max(0.0)
    }

    pub fn max_y(&self) -> f64 {
        (self.content_height - self.viewport_height()).max(0.0)
    }

    fn clamp(&mut self) {
        self.x = self.x.clamp(0.0, self.max_x());
        self.y = self.y.clamp(0.0, self.max_y());
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.x = if x.is_finite() { x } else { self.x };
        self.y = if y.is_finite() { y } else { self.y };
        self.clamp();
    }

    /// Returns true if either offset changed
    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> bool {
        let before = (self.x, self.y);
        self.scroll_to(self.x + dx, self.y + dy);
        before != (self.x, self.y)
    }

    pub fn has_scrollbar(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.max_x() > 0.0,
            Axis::Vertical => self.max_y() > 0.0,
        }
    }

    /// Track rectangle, present only when the axis can scroll
    pub fn track(&self, axis: Axis) -> Option<Rect> {
        if !self.has_scrollbar(axis) {
            return None;
        }
        let r = self.data_rect;
        Some(match axis {
            Axis::Vertical => Rect::new(r.right(), r.y, self.thickness, r.height),
            Axis::Horizontal => Rect::new(r.x, r.bottom(), r.width, self.thickness),
        })
    }

    fn axis_values(&self, axis: Axis) -> (f64, f64, f64) {
        match axis {
            Axis::Horizontal => (self.x, self.max_x(), self.content_width),
            Axis::Vertical => (self.y, self.max_y(), self.content_height),
        }
    }

    /// Thumb rectangle: length proportional to viewport/content, floored at
    /// the minimum thumb length
    pub fn thumb(&self, axis: Axis) -> Option<Rect> {
        let track = self.track(axis)?;
        let (offset, max, content) = self.axis_values(axis);
        let track_len = match axis {
            Axis::Horizontal => track.width,
            Axis::Vertical => track.height,
        };
        let viewport = content - max;
        let ratio = if content > 0.0 { viewport / content } else { 1.0 };
        let thumb_len = ((track_len as f64 * ratio) as f32)
            .max(self.min_thumb)
            .min(track_len);
        let travel = (track_len - thumb_len).max(0.0);
        let pos = if max > 0.0 {
            (travel as f64 * offset / max) as f32
        } else {
            0.0
        };
        Some(match axis {
            Axis::Horizontal => Rect::new(track.x + pos, track.y, thumb_len, track.height),
            Axis::Vertical => Rect::new(track.x, track.y + pos, track.width, thumb_len),
        })
    }

    pub fn begin_drag(&mut self, axis: Axis, pointer: f32) {
        let (start_scroll, _, _) = self.axis_values(axis);
        self.drag = Some(ThumbDrag {
            axis,
            start_pointer: pointer,
            start_scroll,
        });
        tracing::debug!(?axis, "scrollbar drag started");
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_axis(&self) -> Option<Axis> {
        self.drag.map(|d| d.axis)
    }

    /// Apply a drag position. The delta is always measured from the
    /// drag-start pointer against the drag-start scroll value, so repeated
    /// moves cannot accumulate drift. Returns true if the offset changed.
    pub fn drag_to(&mut self, pointer: f32) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let Some(track) = self.track(drag.axis) else {
            return false;
        };
        let (track_len, max) = match drag.axis {
            Axis::Horizontal => (track.width, self.max_x()),
            Axis::Vertical => (track.height, self.max_y()),
        };
        if track_len <= 0.0 {
            return false;
        }
        let delta = (pointer - drag.start_pointer) as f64 * max / track_len as f64;
        let target = drag.start_scroll + delta;
        let (before, _, _) = self.axis_values(drag.axis);
        match drag.axis {
            Axis::Horizontal => self.scroll_to(target, self.y),
            Axis::Vertical => self.scroll_to(self.x, target),
        }
        let (after, _, _) = self.axis_values(drag.axis);
        after != before
    }

    pub fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            tracing::debug!("scrollbar drag ended");
        }
    }

    /// Track click: page by one viewport toward `pointer`
    pub fn page_toward(&mut self, axis: Axis, pointer: f32) -> bool {
        let Some(thumb) = self.thumb(axis) else {
            return false;
        };
        match axis {
            Axis::Vertical => {
                let page = self.viewport_height();
                let dir = if pointer < thumb.y { -1.0 } else { 1.0 };
                self.scroll_by(0.0, dir * page)
            }
            Axis::Horizontal => {
                let page = self.viewport_width();
                let dir = if pointer < thumb.x { -1.0 } else { 1.0 };
                self.scroll_by(dir * page, 0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1000 rows of 20px in a 400px tall, 300px wide data area
    fn model() -> ScrollModel {
        let mut m = ScrollModel::new(12.0, 30.0);
        m.set_extent(900.0, 20_000.0, Rect::new(40.0, 24.0, 300.0, 400.0));
        m
    }

    #[test]
    fn test_offsets_are_clamped() {
        let mut m = model();
        m.scroll_by(-50.0, -50.0);
        assert_eq!((m.x(), m.y()), (0.0, 0.0));
        m.scroll_by(1e9, 1e9);
        assert_eq!(m.x(), 600.0);
        assert_eq!(m.y(), 19_600.0);
        m.scroll_to(f64::NAN, 10.0);
        assert_eq!(m.x(), 600.0);
    }

    #[test]
    fn test_shrinking_content_reclamps() {
        let mut m = model();
        m.scroll_to(600.0, 19_600.0);
        m.set_extent(200.0, 300.0, Rect::new(40.0, 24.0, 300.0, 400.0));
        assert_eq!((m.x(), m.y()), (0.0, 0.0));
        assert!(m.track(Axis::Vertical).is_none());
        assert!(m.track(Axis::Horizontal).is_none());
    }

    #[test]
    fn test_thumb_has_minimum_length() {
        let m = model();
        let thumb = m.thumb(Axis::Vertical).unwrap();
        // 400/20000 of a 400px track would be 8px
        assert_eq!(thumb.height, 30.0);
        assert_eq!(thumb.x, 340.0);
        let h = m.thumb(Axis::Horizontal).unwrap();
        assert_eq!(h.width, 100.0);
    }

    #[test]
    fn test_drag_is_relative_to_drag_start() {
        let mut m = model();
        m.begin_drag(Axis::Vertical, 100.0);
        assert!(m.drag_to(140.0));
        // 40/400 of 19600
        assert_eq!(m.y(), 1960.0);
        // Moving back to the start restores the start offset exactly
        m.drag_to(120.0);
        m.drag_to(100.0);
        assert_eq!(m.y(), 0.0);
        m.end_drag();
        assert!(!m.is_dragging());
        assert!(!m.drag_to(300.0));
    }

    #[test]
    fn test_track_click_pages() {
        let mut m = model();
        assert!(m.page_toward(Axis::Vertical, 300.0));
        assert_eq!(m.y(), 400.0);
        assert!(m.page_toward(Axis::Vertical, 25.0));
        assert_eq!(m.y(), 0.0);
    }
}

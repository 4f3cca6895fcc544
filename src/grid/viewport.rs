//! Surface geometry and viewport culling
//!
//! ```text
//! ┌────────┬──────────────────────────┬──┐
//! │ corner │ column headers           │  │
//! ├────────┼──────────────────────────┤v │
//! │ gutter │ data area                │s │
//! │ (row#) │                          │b │
//! ├────────┴──────────────────────────┼──┤
//! │        horizontal scrollbar       │  │
//! └───────────────────────────────────┴──┘
//! ```
//!
//! The culled window is the only range ever requested from the provider.

use std::ops::Range;

use super::layout::ColumnLayout;
use super::Rect;
use crate::data::ProviderWindow;

/// Resolved surface geometry for one layout pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridGeometry {
    pub surface_width: f32,
    pub surface_height: f32,
    pub header_height: f32,
    pub gutter_width: f32,
    pub row_height: f32,
    pub scrollbar_thickness: f32,
    pub vertical_scrollbar: bool,
    pub horizontal_scrollbar: bool,
}

impl GridGeometry {
    /// Resolve scrollbar presence and column layout together.
    ///
    /// A horizontal scrollbar steals height, which can require a vertical
    /// one, which steals width. Two passes always settle: the vertical
    /// decision only ever flips from absent to present.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve<F>(
        surface_width: f32,
        surface_height: f32,
        header_height: f32,
        gutter_width: f32,
        row_height: f32,
        scrollbar_thickness: f32,
        total_rows: usize,
        mut layout_columns: F,
    ) -> (Self, ColumnLayout)
    where
        F: FnMut(f64) -> ColumnLayout,
    {
        let mut geometry = Self {
            surface_width,
            surface_height,
            header_height,
            gutter_width,
            row_height,
            scrollbar_thickness,
            vertical_scrollbar: false,
            horizontal_scrollbar: false,
        };
        let content_height = total_rows as f64 * row_height as f64;
        geometry.vertical_scrollbar = content_height > geometry.data_rect().height as f64;

        let mut layout = ColumnLayout::default();
        for _ in 0..2 {
            let available = geometry.data_rect().width.max(0.0) as f64;
            layout = layout_columns(available);
            geometry.horizontal_scrollbar = layout.total_width() > available;

            let vertical = content_height > geometry.data_rect().height.max(0.0) as f64;
            if vertical == geometry.vertical_scrollbar {
                break;
            }
            geometry.vertical_scrollbar = vertical;
        }
        (geometry, layout)
    }

    /// Data area: surface minus header, gutter and present scrollbars
    pub fn data_rect(&self) -> Rect {
        let v = if self.vertical_scrollbar {
            self.scrollbar_thickness
        } else {
            0.0
        };
        let h = if self.horizontal_scrollbar {
            self.scrollbar_thickness
        } else {
            0.0
        };
        Rect::new(
            self.gutter_width,
            self.header_height,
            (self.surface_width - self.gutter_width - v).max(0.0),
            (self.surface_height - self.header_height - h).max(0.0),
        )
    }

    /// Column header strip, same width as the data area
    pub fn header_rect(&self) -> Rect {
        let data = self.data_rect();
        Rect::new(data.x, 0.0, data.width, self.header_height)
    }

    /// Row-index gutter strip, same height as the data area
    pub fn gutter_rect(&self) -> Rect {
        let data = self.data_rect();
        Rect::new(0.0, data.y, self.gutter_width, data.height)
    }

    pub fn corner_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.gutter_width, self.header_height)
    }

    /// Surface y of the top edge of `row`
    pub fn row_top(&self, row: usize, scroll_y: f64) -> f32 {
        (self.header_height as f64 + row as f64 * self.row_height as f64 - scroll_y) as f32
    }

    /// Surface x of the left edge of `col`
    pub fn col_left(&self, layout: &ColumnLayout, col: usize, scroll_x: f64) -> f32 {
        (self.gutter_width as f64 + layout.offset(col) - scroll_x) as f32
    }

    /// Content-space row under surface `y`, if `y` is in the data area
    pub fn row_at(&self, y: f32, scroll_y: f64, total_rows: usize) -> Option<usize> {
        let data = self.data_rect();
        if y < data.y || y >= data.bottom() || self.row_height <= 0.0 {
            return None;
        }
        let content_y = (y - data.y) as f64 + scroll_y;
        let row = (content_y / self.row_height as f64).floor() as usize;
        (row < total_rows).then_some(row)
    }

    /// Content-space column under surface `x`, if `x` is in the data area
    pub fn col_at(&self, layout: &ColumnLayout, x: f32, scroll_x: f64) -> Option<usize> {
        let data = self.data_rect();
        if x < data.x || x >= data.right() {
            return None;
        }
        layout.column_at((x - data.x) as f64 + scroll_x)
    }

    pub fn visible(&self, layout: &ColumnLayout, scroll_x: f64, scroll_y: f64, total_rows: usize) -> VisibleRange {
        let data = self.data_rect();
        VisibleRange {
            rows: visible_rows(scroll_y, self.row_height as f64, data.height as f64, total_rows),
            cols: visible_cols(layout, scroll_x, data.width as f64),
        }
    }
}

/// Visible row and column index ranges (exclusive ends)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleRange {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl VisibleRange {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    pub fn window(&self) -> ProviderWindow {
        ProviderWindow::new(self.rows.start, self.rows.end, self.cols.start, self.cols.end)
    }
}

/// Rows intersecting `[scroll_y, scroll_y + viewport_height)`.
///
/// When the offset is row-aligned this is exactly
/// `start + ceil(viewport / row_height)`; a partially scrolled row at the
/// bottom is included as well.
pub fn visible_rows(scroll_y: f64, row_height: f64, viewport_height: f64, total_rows: usize) -> Range<usize> {
    if row_height <= 0.0 || viewport_height <= 0.0 || total_rows == 0 {
        return 0..0;
    }
    let scroll_y = scroll_y.max(0.0);
    let start = ((scroll_y / row_height).floor() as usize).min(total_rows);
    let end = (((scroll_y + viewport_height) / row_height).ceil() as usize).min(total_rows);
    start..end.max(start)
}

/// Columns intersecting `[scroll_x, scroll_x + viewport_width)`, found by
/// walking cumulative offsets
pub fn visible_cols(layout: &ColumnLayout, scroll_x: f64, viewport_width: f64) -> Range<usize> {
    if viewport_width <= 0.0 || layout.is_empty() {
        return 0..0;
    }
    let left = scroll_x.max(0.0);
    let right = left + viewport_width;
    let n = layout.len();

    let mut start = 0;
    while start < n && layout.offset(start + 1) <= left {
        start += 1;
    }
    let mut end = start;
    while end < n && layout.offset(end) < right {
        end += 1;
    }
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_rows_aligned() {
        assert_eq!(visible_rows(0.0, 20.0, 100.0, 1000), 0..5);
        assert_eq!(visible_rows(200.0, 20.0, 100.0, 1000), 10..15);
    }

    #[test]
    fn test_visible_rows_partial_and_clamped() {
        assert_eq!(visible_rows(210.0, 20.0, 100.0, 1000), 10..16);
        assert_eq!(visible_rows(19_950.0, 20.0, 100.0, 1000), 997..1000);
        assert_eq!(visible_rows(0.0, 20.0, 100.0, 3), 0..3);
        assert_eq!(visible_rows(0.0, 20.0, 100.0, 0), 0..0);
        assert_eq!(visible_rows(1e12, 20.0, 100.0, 10), 10..10);
    }

    #[test]
    fn test_visible_cols_walks_offsets() {
        let layout = ColumnLayout::from_widths(vec![100.0, 50.0, 200.0, 80.0]);
        assert_eq!(visible_cols(&layout, 0.0, 120.0), 0..2);
        assert_eq!(visible_cols(&layout, 100.0, 50.0), 1..2);
        assert_eq!(visible_cols(&layout, 149.0, 10.0), 1..3);
        assert_eq!(visible_cols(&layout, 300.0, 1000.0), 2..4);
        assert_eq!(visible_cols(&layout, 5000.0, 100.0), 4..4);
    }

    fn resolve(width: f32, rows: usize, col_width: f64, cols: usize) -> (GridGeometry, ColumnLayout) {
        GridGeometry::resolve(width, 200.0, 20.0, 30.0, 20.0, 10.0, rows, |available| {
            let headers = vec!["h"; cols];
            ColumnLayout::compute(&headers, |_| 0.0, col_width, 0.0, available)
        })
    }

    #[test]
    fn test_resolve_without_scrollbars() {
        let (g, layout) = resolve(400.0, 5, 50.0, 3);
        assert!(!g.vertical_scrollbar && !g.horizontal_scrollbar);
        assert_eq!(layout.total_width(), 370.0);
    }

    #[test]
    fn test_resolve_horizontal_forces_vertical() {
        // 9 rows * 20 = 180 fits in 180px, but not once a 10px bar is added
        let (g, layout) = resolve(200.0, 9, 100.0, 3);
        assert!(g.horizontal_scrollbar);
        assert!(g.vertical_scrollbar);
        assert_eq!(layout.total_width(), 300.0);
        assert_eq!(g.data_rect(), Rect::new(30.0, 20.0, 160.0, 170.0));
    }

    #[test]
    fn test_row_and_col_lookup() {
        let (g, layout) = resolve(400.0, 5, 50.0, 3);
        assert_eq!(g.row_at(20.0, 0.0, 5), Some(0));
        assert_eq!(g.row_at(119.0, 0.0, 5), Some(4));
        assert_eq!(g.row_at(120.0, 0.0, 5), None);
        assert_eq!(g.row_at(10.0, 0.0, 5), None);
        assert_eq!(g.col_at(&layout, 30.0, 0.0), Some(0));
        assert_eq!(g.col_at(&layout, 29.0, 0.0), None);
    }
}

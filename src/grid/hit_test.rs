//! Hit-testing for pointer events
//!
//! Follows a "hit-test → dispatch" pattern: [`hit_test`] resolves the
//! highest-priority target under a point, and the controller matches on it.
//! Priority: scrollbars, corner, column headers, row-index gutter, cells.
//! Anything else, including space past the last row or column, is
//! [`HitTarget::None`].

use super::layout::ColumnLayout;
use super::scroll::{Axis, ScrollModel};
use super::viewport::GridGeometry;
use super::HEADER;

/// Which part of a scrollbar was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollbarPart {
    Thumb,
    /// Track before (above/left of) the thumb
    TrackBefore,
    /// Track after (below/right of) the thumb
    TrackAfter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Scrollbar(Axis, ScrollbarPart),
    /// Header ∩ gutter
    Corner,
    ColumnHeader(usize),
    RowHeader(usize),
    Cell { row: usize, col: usize },
    None,
}

impl HitTarget {
    /// Position in selection/hover coordinates (`-1` for header/gutter)
    pub fn grid_position(&self) -> Option<(i64, i64)> {
        match *self {
            HitTarget::Corner => Some((HEADER, HEADER)),
            HitTarget::ColumnHeader(col) => Some((HEADER, col as i64)),
            HitTarget::RowHeader(row) => Some((row as i64, HEADER)),
            HitTarget::Cell { row, col } => Some((row as i64, col as i64)),
            HitTarget::Scrollbar(..) | HitTarget::None => None,
        }
    }
}

/// Resolve the target under surface point `(x, y)`
pub fn hit_test(
    geometry: &GridGeometry,
    layout: &ColumnLayout,
    scroll: &ScrollModel,
    total_rows: usize,
    x: f32,
    y: f32,
) -> HitTarget {
    for axis in [Axis::Vertical, Axis::Horizontal] {
        let Some(track) = scroll.track(axis) else {
            continue;
        };
        if !track.contains(x, y) {
            continue;
        }
        let part = match scroll.thumb(axis) {
            Some(thumb) if thumb.contains(x, y) => ScrollbarPart::Thumb,
            Some(thumb) => {
                let before = match axis {
                    Axis::Vertical => y < thumb.y,
                    Axis::Horizontal => x < thumb.x,
                };
                if before {
                    ScrollbarPart::TrackBefore
                } else {
                    ScrollbarPart::TrackAfter
                }
            }
            None => ScrollbarPart::TrackAfter,
        };
        return HitTarget::Scrollbar(axis, part);
    }

    if geometry.corner_rect().contains(x, y) {
        return HitTarget::Corner;
    }

    if geometry.header_rect().contains(x, y) {
        return match geometry.col_at(layout, x, scroll.x()) {
            Some(col) => HitTarget::ColumnHeader(col),
            None => HitTarget::None,
        };
    }

    if geometry.gutter_rect().contains(x, y) {
        return match geometry.row_at(y, scroll.y(), total_rows) {
            Some(row) => HitTarget::RowHeader(row),
            None => HitTarget::None,
        };
    }

    match (
        geometry.row_at(y, scroll.y(), total_rows),
        geometry.col_at(layout, x, scroll.x()),
    ) {
        (Some(row), Some(col)) => HitTarget::Cell { row, col },
        _ => HitTarget::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Rect;

    /// 300x200 surface, 20px header, 30px gutter, 20px rows, 10px bars,
    /// three 100px columns and 50 rows: both scrollbars present
    fn fixture() -> (GridGeometry, ColumnLayout, ScrollModel) {
        let (geometry, layout) = GridGeometry::resolve(300.0, 200.0, 20.0, 30.0, 20.0, 10.0, 50, |_| {
            ColumnLayout::from_widths(vec![100.0, 100.0, 100.0])
        });
        let mut scroll = ScrollModel::new(10.0, 30.0);
        scroll.set_extent(layout.total_width(), 50.0 * 20.0, geometry.data_rect());
        (geometry, layout, scroll)
    }

    #[test]
    fn test_priority_order() {
        let (g, l, s) = fixture();
        assert_eq!(g.data_rect(), Rect::new(30.0, 20.0, 260.0, 170.0));
        assert_eq!(hit_test(&g, &l, &s, 50, 5.0, 5.0), HitTarget::Corner);
        assert_eq!(hit_test(&g, &l, &s, 50, 135.0, 5.0), HitTarget::ColumnHeader(1));
        assert_eq!(hit_test(&g, &l, &s, 50, 5.0, 45.0), HitTarget::RowHeader(1));
        assert_eq!(
            hit_test(&g, &l, &s, 50, 240.0, 65.0),
            HitTarget::Cell { row: 2, col: 2 }
        );
        assert_eq!(
            hit_test(&g, &l, &s, 50, 295.0, 25.0),
            HitTarget::Scrollbar(Axis::Vertical, ScrollbarPart::Thumb)
        );
        assert_eq!(
            hit_test(&g, &l, &s, 50, 295.0, 180.0),
            HitTarget::Scrollbar(Axis::Vertical, ScrollbarPart::TrackAfter)
        );
        assert_eq!(
            hit_test(&g, &l, &s, 50, 270.0, 195.0),
            HitTarget::Scrollbar(Axis::Horizontal, ScrollbarPart::TrackAfter)
        );
    }

    #[test]
    fn test_out_of_range_is_none() {
        let (g, l, mut s) = fixture();
        // Bottom-right square between both bars
        assert_eq!(hit_test(&g, &l, &s, 50, 295.0, 195.0), HitTarget::None);
        // Past the last row of a short dataset
        s.set_extent(l.total_width(), 40.0, g.data_rect());
        assert_eq!(hit_test(&g, &l, &s, 2, 100.0, 150.0), HitTarget::None);
        assert_eq!(hit_test(&g, &l, &s, 2, -10.0, -10.0), HitTarget::None);
    }

    #[test]
    fn test_scroll_offsets_shift_targets() {
        let (g, l, mut s) = fixture();
        s.scroll_to(40.0, 200.0);
        assert_eq!(
            hit_test(&g, &l, &s, 50, 95.0, 25.0),
            HitTarget::Cell { row: 10, col: 1 }
        );
        assert_eq!(HitTarget::RowHeader(3).grid_position(), Some((3, -1)));
        assert_eq!(HitTarget::None.grid_position(), None);
    }
}

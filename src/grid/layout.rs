//! Column width layout
//!
//! Each column starts at its measured header width plus padding, floored at
//! the minimum width. Short content grows to fill the available width in
//! proportion to those widths; wide content keeps its measured widths and
//! scrolls. Columns never shrink below their measured minimum.

/// Per-column pixel widths with cumulative offsets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    widths: Vec<f64>,
    min_widths: Vec<f64>,
    /// `offsets[i]` is the content-space x of column `i`; one extra entry
    /// holds the total width
    offsets: Vec<f64>,
}

impl ColumnLayout {
    /// Lay out `headers` into `available` pixels.
    pub fn compute<S, F>(headers: &[S], measure: F, min_width: f64, padding: f64, available: f64) -> Self
    where
        S: AsRef<str>,
        F: Fn(&str) -> f32,
    {
        let min_widths: Vec<f64> = headers
            .iter()
            .map(|h| (measure(h.as_ref()) as f64 + 2.0 * padding).ceil().max(min_width))
            .collect();

        let measured: f64 = min_widths.iter().sum();
        let mut widths = min_widths.clone();

        if measured > 0.0 && measured < available {
            let surplus = available - measured;
            let mut distributed = 0.0;
            for w in widths.iter_mut() {
                let extra = (surplus * *w / measured).floor();
                *w += extra;
                distributed += extra;
            }
            // Rounding remainder goes to the last column so the sum is exact
            if let Some(last) = widths.last_mut() {
                *last += surplus - distributed;
            }
        }

        Self::from_widths_with_minimums(widths, min_widths)
    }

    /// Layout with explicit widths (each is also its own minimum)
    pub fn from_widths(widths: Vec<f64>) -> Self {
        let min_widths = widths.clone();
        Self::from_widths_with_minimums(widths, min_widths)
    }

    fn from_widths_with_minimums(widths: Vec<f64>, min_widths: Vec<f64>) -> Self {
        let mut offsets = Vec::with_capacity(widths.len() + 1);
        let mut x = 0.0;
        offsets.push(x);
        for w in &widths {
            x += w;
            offsets.push(x);
        }
        Self {
            widths,
            min_widths,
            offsets,
        }
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn min_widths(&self) -> &[f64] {
        &self.min_widths
    }

    pub fn width(&self, col: usize) -> f64 {
        self.widths.get(col).copied().unwrap_or(0.0)
    }

    /// Content-space left edge of `col`
    pub fn offset(&self, col: usize) -> f64 {
        self.offsets
            .get(col)
            .copied()
            .unwrap_or_else(|| self.total_width())
    }

    pub fn total_width(&self) -> f64 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    /// Column containing content-space `x`, if any
    pub fn column_at(&self, x: f64) -> Option<usize> {
        if x < 0.0 || x >= self.total_width() {
            return None;
        }
        // offsets is sorted; find the last offset <= x
        let idx = self.offsets.partition_point(|&o| o <= x);
        idx.checked_sub(1).filter(|&c| c < self.widths.len())
    }
}

/// Width of the row-index gutter: room for the digits of `total_rows`
pub fn gutter_width<F>(total_rows: usize, measure: F, padding: f64) -> f64
where
    F: Fn(&str) -> f32,
{
    let digits = total_rows.max(1).to_string().len().max(2);
    let sample = "0".repeat(digits);
    (measure(&sample) as f64 + 2.0 * padding).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 7px per char, like a fixed-advance font at ~12px
    fn measure(s: &str) -> f32 {
        s.chars().count() as f32 * 7.0
    }

    #[test]
    fn test_short_content_fills_available_width() {
        let layout = ColumnLayout::compute(&["id", "name", "created"], measure, 60.0, 8.0, 500.0);
        assert_eq!(layout.total_width(), 500.0);
        for (w, min) in layout.widths().iter().zip(layout.min_widths()) {
            assert!(w >= min);
        }
    }

    #[test]
    fn test_wide_content_keeps_measured_widths() {
        let headers = ["a_very_long_header_name", "another_long_header", "third"];
        let layout = ColumnLayout::compute(&headers, measure, 60.0, 8.0, 200.0);
        let expected: f64 = layout.min_widths().iter().sum();
        assert_eq!(layout.total_width(), expected);
        assert!(layout.total_width() > 200.0);
        assert_eq!(layout.widths(), layout.min_widths());
    }

    #[test]
    fn test_min_width_floor() {
        let layout = ColumnLayout::compute(&["x"], measure, 60.0, 8.0, 0.0);
        assert_eq!(layout.width(0), 60.0);
    }

    #[test]
    fn test_surplus_is_proportional() {
        let layout = ColumnLayout::from_widths(vec![100.0, 300.0]);
        assert_eq!(layout.offset(1), 100.0);
        let layout = ColumnLayout::compute(
            &["a".repeat(12), "b".repeat(40)],
            measure,
            10.0,
            8.0,
            800.0,
        );
        // 100 and 296 measured; surplus 404 split ~1:3
        assert!(layout.width(1) > layout.width(0) * 2.5);
        assert_eq!(layout.total_width(), 800.0);
    }

    #[test]
    fn test_column_at() {
        let layout = ColumnLayout::from_widths(vec![50.0, 70.0, 30.0]);
        assert_eq!(layout.column_at(0.0), Some(0));
        assert_eq!(layout.column_at(49.9), Some(0));
        assert_eq!(layout.column_at(50.0), Some(1));
        assert_eq!(layout.column_at(149.0), Some(2));
        assert_eq!(layout.column_at(150.0), None);
        assert_eq!(layout.column_at(-1.0), None);
    }

    #[test]
    fn test_gutter_grows_with_row_count() {
        let small = gutter_width(9, measure, 8.0);
        let large = gutter_width(1_000_000, measure, 8.0);
        assert!(large > small);
        assert_eq!(small, 2.0 * 7.0 + 16.0);
    }
}

//! Selection state machine
//!
//! ```text
//!   Idle ──pointer-down on cell──▶ Dragging ──pointer-up──▶ Idle
//!                                    │  ▲
//!                                    └──┘ pointer-move: end anchor only
//! ```
//!
//! Anchors are stored in raw drag order and normalized on read. Column and
//! row pins (`selected_cols` / `selected_rows`) are independent of the cell
//! range.

use std::collections::BTreeSet;

use super::HEADER;

/// A rectangular selection between two anchors (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    pub start_row: i64,
    pub end_row: i64,
    pub start_col: i64,
    pub end_col: i64,
}

impl SelectionRange {
    pub fn new(start_row: i64, start_col: i64, end_row: i64, end_col: i64) -> Self {
        Self {
            start_row,
            end_row,
            start_col,
            end_col,
        }
    }

    /// A single-cell range
    pub fn cell(row: i64, col: i64) -> Self {
        Self::new(row, col, row, col)
    }

    /// Start at the top-left, end at the bottom-right
    pub fn normalized(&self) -> Self {
        Self {
            start_row: self.start_row.min(self.end_row),
            end_row: self.start_row.max(self.end_row),
            start_col: self.start_col.min(self.end_col),
            end_col: self.start_col.max(self.end_col),
        }
    }

    pub fn contains(&self, row: i64, col: i64) -> bool {
        let n = self.normalized();
        (n.start_row..=n.end_row).contains(&row) && (n.start_col..=n.end_col).contains(&col)
    }

    /// Whether the header row is part of the range
    pub fn includes_header(&self) -> bool {
        self.normalized().start_row == HEADER
    }

    /// Whether the row-index gutter is part of the range
    pub fn includes_gutter(&self) -> bool {
        self.normalized().start_col == HEADER
    }

    /// Data rows covered, as an exclusive `usize` range
    pub fn data_rows(&self) -> std::ops::Range<usize> {
        let n = self.normalized();
        n.start_row.max(0) as usize..(n.end_row + 1).max(0) as usize
    }

    /// Data columns covered, as an exclusive `usize` range
    pub fn data_cols(&self) -> std::ops::Range<usize> {
        let n = self.normalized();
        n.start_col.max(0) as usize..(n.end_col + 1).max(0) as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    range: Option<SelectionRange>,
    dragging: bool,
    selected_cols: BTreeSet<usize>,
    selected_rows: BTreeSet<usize>,
    multi_select_columns: bool,
}

impl SelectionModel {
    pub fn new(multi_select_columns: bool) -> Self {
        Self {
            multi_select_columns,
            ..Self::default()
        }
    }

    /// Raw anchors, in drag order
    pub fn range(&self) -> Option<SelectionRange> {
        self.range
    }

    pub fn normalized(&self) -> Option<SelectionRange> {
        self.range.map(|r| r.normalized())
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn selected_cols(&self) -> &BTreeSet<usize> {
        &self.selected_cols
    }

    pub fn selected_rows(&self) -> &BTreeSet<usize> {
        &self.selected_rows
    }

    /// The end anchor: where keyboard moves start from
    pub fn active_cell(&self) -> Option<(i64, i64)> {
        self.range.map(|r| (r.end_row, r.end_col))
    }

    /// Pointer-down on a cell: collapse to it and start dragging
    pub fn begin_drag(&mut self, row: i64, col: i64) {
        self.range = Some(SelectionRange::cell(row, col));
        self.dragging = true;
    }

    /// Pointer-move while dragging: only the end anchor follows.
    /// Returns true if the range changed.
    pub fn update_drag(&mut self, row: i64, col: i64) -> bool {
        if !self.dragging {
            return false;
        }
        match self.range.as_mut() {
            Some(r) if (r.end_row, r.end_col) != (row, col) => {
                r.end_row = row;
                r.end_col = col;
                true
            }
            _ => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn set_range(&mut self, range: SelectionRange) {
        self.range = Some(range);
    }

    /// Drop the cell range and any pins
    pub fn clear(&mut self) -> bool {
        let changed =
            self.range.is_some() || !self.selected_cols.is_empty() || !self.selected_rows.is_empty();
        self.range = None;
        self.dragging = false;
        self.selected_cols.clear();
        self.selected_rows.clear();
        changed
    }

    /// Header click: toggle the column, replacing the set in single-select mode
    pub fn toggle_column(&mut self, col: usize) {
        if self.selected_cols.remove(&col) {
            return;
        }
        if !self.multi_select_columns {
            self.selected_cols.clear();
        }
        self.selected_cols.insert(col);
    }

    /// Row-index click: toggle the row pin
    pub fn toggle_row(&mut self, row: usize) {
        if !self.selected_rows.remove(&row) {
            self.selected_rows.insert(row);
        }
    }

    /// Most recently meaningful pinned column for the stats panel
    pub fn primary_column(&self) -> Option<usize> {
        self.selected_cols.iter().next_back().copied()
    }

    /// Arrow-key move by `(d_row, d_col)`, clamped to the data grid.
    ///
    /// With `extend`, only the end anchor moves; otherwise both anchors
    /// collapse to the target. Returns the target cell.
    pub fn move_active(
        &mut self,
        d_row: i64,
        d_col: i64,
        extend: bool,
        total_rows: usize,
        total_cols: usize,
    ) -> Option<(i64, i64)> {
        if total_rows == 0 || total_cols == 0 {
            return None;
        }
        let (row, col) = self.active_cell().unwrap_or((0, 0));
        let target = (
            (row.saturating_add(d_row)).clamp(0, total_rows as i64 - 1),
            (col.saturating_add(d_col)).clamp(0, total_cols as i64 - 1),
        );
        self.move_to(target.0, target.1, extend);
        Some(target)
    }

    /// Place the active anchor at an absolute cell
    pub fn move_to(&mut self, row: i64, col: i64, extend: bool) {
        match (self.range.as_mut(), extend) {
            (Some(r), true) => {
                r.end_row = row;
                r.end_col = col;
            }
            _ => self.range = Some(SelectionRange::cell(row, col)),
        }
    }

    /// Every data cell
    pub fn select_all(&mut self, total_rows: usize, total_cols: usize) -> bool {
        if total_rows == 0 || total_cols == 0 {
            return false;
        }
        self.range = Some(SelectionRange::new(
            0,
            0,
            total_rows as i64 - 1,
            total_cols as i64 - 1,
        ));
        true
    }
}

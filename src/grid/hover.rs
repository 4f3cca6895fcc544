//! Hovered cell tracking

use super::dirty::RenderDirtyLevel;
use super::HEADER;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverModel {
    cell: Option<(i64, i64)>,
}

/// Tier a hover position needs: header cells band their column, gutter
/// cells band their row, data cells highlight alone
fn tier_for(cell: Option<(i64, i64)>) -> RenderDirtyLevel {
    match cell {
        None => RenderDirtyLevel::None,
        Some((HEADER, HEADER)) => RenderDirtyLevel::CellHover,
        Some((HEADER, _)) => RenderDirtyLevel::ColHover,
        Some((_, HEADER)) => RenderDirtyLevel::RowHover,
        Some(_) => RenderDirtyLevel::CellHover,
    }
}

impl HoverModel {
    pub fn cell(&self) -> Option<(i64, i64)> {
        self.cell
    }

    /// Update the hovered cell, returning the tier needed to repaint both
    /// the old and new highlight (`None` if nothing changed)
    pub fn set(&mut self, cell: Option<(i64, i64)>) -> RenderDirtyLevel {
        if self.cell == cell {
            return RenderDirtyLevel::None;
        }
        let tier = tier_for(self.cell).max(tier_for(cell));
        self.cell = cell;
        tier
    }

    pub fn clear(&mut self) -> RenderDirtyLevel {
        self.set(None)
    }
}

//! Dirty-tier accumulation
//!
//! Handlers raise the minimal tier their change needs. Between draws the
//! tracker keeps the maximum; a draw takes it and resets to `None`.
//!
//! | tier        | base grid | selection | hover |
//! |-------------|-----------|-----------|-------|
//! | `CellHover` |           |           |   x   |
//! | `RowHover`  |           |           |   x   |
//! | `ColHover`  |           |           |   x   |
//! | `Selection` |           |     x     |   x   |
//! | `Cells`     |     x     |     x     |   x   |

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderDirtyLevel {
    #[default]
    None,
    CellHover,
    RowHover,
    ColHover,
    Selection,
    Cells,
}

impl RenderDirtyLevel {
    pub fn paints_base(self) -> bool {
        self >= RenderDirtyLevel::Cells
    }

    pub fn paints_selection(self) -> bool {
        self >= RenderDirtyLevel::Selection
    }

    pub fn paints_hover(self) -> bool {
        self >= RenderDirtyLevel::CellHover
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyTracker {
    level: RenderDirtyLevel,
}

impl DirtyTracker {
    /// Accumulate `level`, keeping the maximum
    pub fn raise(&mut self, level: RenderDirtyLevel) {
        self.level = self.level.max(level);
    }

    pub fn level(&self) -> RenderDirtyLevel {
        self.level
    }

    pub fn is_dirty(&self) -> bool {
        self.level != RenderDirtyLevel::None
    }

    /// Take the accumulated tier and reset
    pub fn take(&mut self) -> RenderDirtyLevel {
        std::mem::take(&mut self.level)
    }
}

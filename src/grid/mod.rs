//! Grid geometry and interaction state
//!
//! Everything here is pure state plus arithmetic: no pixels, no provider
//! calls. The controller owns one of each model and the render engine reads
//! them.
//!
//! Index conventions: data rows and columns are `usize`. Where a header or
//! the row-index gutter can be addressed (selection anchors, hover), indices
//! are `i64` with `-1` meaning header row or gutter column.

pub mod dirty;
pub mod hit_test;
pub mod hover;
pub mod layout;
pub mod scroll;
pub mod selection;
pub mod viewport;

pub use dirty::{DirtyTracker, RenderDirtyLevel};
pub use hit_test::{hit_test, HitTarget, ScrollbarPart};
pub use hover::HoverModel;
pub use layout::{gutter_width, ColumnLayout};
pub use scroll::{Axis, ScrollModel};
pub use selection::{SelectionModel, SelectionRange};
pub use viewport::{GridGeometry, VisibleRange};

/// Sentinel index for the header row / row-index gutter
pub const HEADER: i64 = -1;

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

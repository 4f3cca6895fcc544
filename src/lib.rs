//! gridview - a virtualized, pixel-rendered data grid
//!
//! This crate provides the grid core: viewport culling, layered incremental
//! redraw, column layout and hit-testing, selection/hover state machines,
//! the type-driven format pipeline, and a multi-tab coordinator.
//! The `gridview` binary hosts it in a winit window.

pub mod clipboard;
pub mod config;
pub mod config_paths;
pub mod controller;
pub mod coordinator;
pub mod data;
pub mod error;
pub mod export;
pub mod focus;
pub mod format;
pub mod grid;
pub mod render;
pub mod stats;
pub mod theme;
pub mod tracing;

// Re-export commonly used types
pub use config::GridConfig;
pub use controller::GridController;
pub use coordinator::MultiGridCoordinator;
pub use data::{CellValue, Column, DataProvider, DataType, DatasetMetadata, InMemoryProvider};
pub use error::{GridError, Result};
pub use theme::Theme;

//! Runtime module - winit/platform integration
//!
//! - `app` - ApplicationHandler, window and surface management
//! - `input` - winit event to grid input mapping

pub mod app;
pub mod input;

pub use app::App;

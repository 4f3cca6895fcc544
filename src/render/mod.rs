//! Pixel rendering: frame primitives, text backends and the layered engine

pub mod engine;
pub mod frame;
pub mod text;

pub use engine::{Layer, LayerKind, RenderEngine, RenderInput, RenderPass};
pub use frame::{blend_colors, Frame};
pub use text::{text_renderer_for, BlockText, FontText, TextRenderer};

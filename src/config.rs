//! Grid configuration persistence
//!
//! Stores user preferences in `~/.config/gridview/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config_paths::ConfigPaths;
use crate::error::{GridError, Result};
use crate::format::FormatOptions;

/// Grid configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Selected theme id (e.g., "light", "dark")
    pub theme: String,
    /// TTF/OTF used for cell text; system fonts are searched when unset
    pub font_path: Option<String>,
    pub font_size: f32,
    pub min_font_size: f32,
    pub max_font_size: f32,
    /// Row height as a multiple of font size
    pub row_height_ratio: f32,
    pub min_column_width: u32,
    pub cell_padding: u32,
    pub border_width: u32,
    pub scrollbar_thickness: u32,
    pub min_thumb_length: u32,
    pub pointer_move_interval_ms: u64,
    /// Pixels scrolled per wheel line
    pub wheel_line_height: f32,
    pub multi_select_columns: bool,
    pub format: FormatOptions,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            font_path: None,
            font_size: 14.0,
            min_font_size: 8.0,
            max_font_size: 24.0,
            row_height_ratio: 1.8,
            min_column_width: 60,
            cell_padding: 8,
            border_width: 1,
            scrollbar_thickness: 12,
            min_thumb_length: 30,
            pointer_move_interval_ms: 16,
            wheel_line_height: 40.0,
            multi_select_columns: false,
            format: FormatOptions::default(),
        }
    }
}

impl GridConfig {
    /// Row height in pixels for the given font size
    pub fn row_height_for(&self, font_size: f32) -> u32 {
        (font_size * self.row_height_ratio).round().max(1.0) as u32
    }

    /// Clamp a font size into the configured zoom range
    pub fn clamp_font_size(&self, size: f32) -> f32 {
        size.clamp(self.min_font_size, self.max_font_size)
    }

    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = ConfigPaths::discover().map(|p| p.config_file()) else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse a config file at an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config.sanitized())
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = ConfigPaths::discover()
            .map(|p| p.config_file())
            .ok_or_else(|| GridError::Other("No config directory available".to_string()))?;
        self.save_to(&path)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Update theme and save
    pub fn set_theme(&mut self, theme_id: &str) -> Result<()> {
        self.theme = theme_id.to_string();
        self.save()
    }

    /// Repair values a hand-edited file could get wrong
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.min_font_size <= 0.0 || self.min_font_size > self.max_font_size {
            self.min_font_size = defaults.min_font_size;
            self.max_font_size = defaults.max_font_size;
        }
        self.font_size = self.clamp_font_size(self.font_size);
        if self.row_height_ratio < 1.0 {
            self.row_height_ratio = defaults.row_height_ratio;
        }
        self.min_column_width = self.min_column_width.max(1);
        self
    }
}

//! Theme system for the grid
//!
//! Colors are injected into the renderer, never computed by it. A theme is
//! YAML with a `ui` block for chrome (headers, overlays, scrollbars) and a
//! `types` block holding one background/text pair per column data type.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/gridview/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary

use std::path::Path;

use serde::Deserialize;

use crate::config_paths::ConfigPaths;
use crate::data::DataType;
use crate::error::{GridError, Result};

// Embed theme YAML files at compile time
pub const LIGHT_YAML: &str = include_str!("../themes/light.yaml");
pub const DARK_YAML: &str = include_str!("../themes/dark.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "light", "dark")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "light",
        yaml: LIGHT_YAML,
    },
    BuiltinTheme {
        id: "dark",
        yaml: DARK_YAML,
    },
];

/// Where the theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// User-defined theme in ~/.config/gridview/themes/
    User,
    /// Built-in theme embedded in binary
    Builtin,
}

/// Information about an available theme
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    pub id: String,
    pub name: String,
    pub source: ThemeSource,
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme> {
    let content = std::fs::read_to_string(path)?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme> {
    load_theme_in(ConfigPaths::discover().as_ref(), id)
}

/// Same as [`load_theme`] against an explicit config directory
pub fn load_theme_in(paths: Option<&ConfigPaths>, id: &str) -> Result<Theme> {
    if let Some(user_path) = paths.map(|p| p.theme_file(id)).filter(|p| p.exists()) {
        tracing::info!("Loading user theme from {}", user_path.display());
        return from_file(&user_path);
    }

    tracing::info!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// List all available themes; user themes shadow builtins with the same id
pub fn list_available_themes() -> Vec<ThemeInfo> {
    list_available_themes_in(ConfigPaths::discover().as_ref())
}

pub fn list_available_themes_in(paths: Option<&ConfigPaths>) -> Vec<ThemeInfo> {
    let mut themes = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();

    if let Some(user_dir) = paths.map(ConfigPaths::themes_dir) {
        if let Ok(entries) = std::fs::read_dir(&user_dir) {
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if !path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
                {
                    continue;
                }
                let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if seen_ids.insert(id.to_string()) {
                    let name = from_file(&path)
                        .map(|t| t.name)
                        .unwrap_or_else(|_| id.to_string());
                    themes.push(ThemeInfo {
                        id: id.to_string(),
                        name,
                        source: ThemeSource::User,
                    });
                }
            }
        }
    }

    for builtin in BUILTIN_THEMES {
        if seen_ids.insert(builtin.id.to_string()) {
            let name = Theme::from_yaml(builtin.yaml)
                .map(|t| t.name)
                .unwrap_or_else(|_| builtin.id.to_string());
            themes.push(ThemeInfo {
                id: builtin.id.to_string(),
                name,
                source: ThemeSource::Builtin,
            });
        }
    }

    themes
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to ARGB u32 for pixel buffers
    pub fn to_argb_u32(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> std::result::Result<Self, String> {
        let s = s.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            s.get(range)
                .ok_or_else(|| format!("Invalid color format: {}", s))
                .and_then(|hex| u8::from_str_radix(hex, 16).map_err(|e| e.to_string()))
        };
        match s.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw YAML schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ThemeData {
    #[allow(dead_code)]
    version: u32,
    name: String,
    ui: UiThemeData,
    types: TypesThemeData,
}

#[derive(Debug, Clone, Deserialize)]
struct UiThemeData {
    surface: SurfaceThemeData,
    header: HeaderThemeData,
    gutter: PairThemeData,
    hover: HoverThemeData,
    selection: SelectionThemeData,
    scrollbar: ScrollbarThemeData,
}

#[derive(Debug, Clone, Deserialize)]
struct SurfaceThemeData {
    background: String,
    grid_line: String,
}

#[derive(Debug, Clone, Deserialize)]
struct HeaderThemeData {
    background: String,
    foreground: String,
    border: String,
    #[serde(default)]
    selected_background: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PairThemeData {
    background: String,
    foreground: String,
}

#[derive(Debug, Clone, Deserialize)]
struct HoverThemeData {
    cell: String,
    band: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SelectionThemeData {
    fill: String,
    border: String,
    band: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ScrollbarThemeData {
    track: String,
    thumb: String,
    #[serde(default)]
    thumb_active: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TypesThemeData {
    null: PairThemeData,
    boolean: PairThemeData,
    integer: PairThemeData,
    float: PairThemeData,
    string: PairThemeData,
    date: PairThemeData,
    datetime: PairThemeData,
}

// ---------------------------------------------------------------------------
// Resolved theme
// ---------------------------------------------------------------------------

/// Background/text color pair injected per data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeColors {
    pub background: Color,
    pub foreground: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderTheme {
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub selected_background: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayTheme {
    pub hover_cell: Color,
    pub hover_band: Color,
    pub selection_fill: Color,
    pub selection_border: Color,
    pub selection_band: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollbarTheme {
    pub track: Color,
    pub thumb: Color,
    pub thumb_active: Color,
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub grid_line: Color,
    pub header: HeaderTheme,
    pub gutter: TypeColors,
    pub overlay: OverlayTheme,
    pub scrollbar: ScrollbarTheme,
    types: [TypeColors; 7],
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

fn parse(field: &str, value: &str) -> Result<Color> {
    Color::from_hex(value).map_err(|e| GridError::Other(format!("theme field {}: {}", field, e)))
}

fn pair(field: &str, data: &PairThemeData) -> Result<TypeColors> {
    Ok(TypeColors {
        background: parse(field, &data.background)?,
        foreground: parse(field, &data.foreground)?,
    })
}

impl Theme {
    /// Parse a theme from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let data: ThemeData = serde_yaml::from_str(yaml)?;
        let ui = &data.ui;
        let header_bg = parse("header.background", &ui.header.background)?;
        let thumb = parse("scrollbar.thumb", &ui.scrollbar.thumb)?;
        let t = &data.types;

        Ok(Self {
            name: data.name.clone(),
            background: parse("surface.background", &ui.surface.background)?,
            grid_line: parse("surface.grid_line", &ui.surface.grid_line)?,
            header: HeaderTheme {
                background: header_bg,
                foreground: parse("header.foreground", &ui.header.foreground)?,
                border: parse("header.border", &ui.header.border)?,
                selected_background: match &ui.header.selected_background {
                    Some(hex) => parse("header.selected_background", hex)?,
                    None => header_bg,
                },
            },
            gutter: pair("gutter", &ui.gutter)?,
            overlay: OverlayTheme {
                hover_cell: parse("hover.cell", &ui.hover.cell)?,
                hover_band: parse("hover.band", &ui.hover.band)?,
                selection_fill: parse("selection.fill", &ui.selection.fill)?,
                selection_border: parse("selection.border", &ui.selection.border)?,
                selection_band: parse("selection.band", &ui.selection.band)?,
            },
            scrollbar: ScrollbarTheme {
                track: parse("scrollbar.track", &ui.scrollbar.track)?,
                thumb,
                thumb_active: match &ui.scrollbar.thumb_active {
                    Some(hex) => parse("scrollbar.thumb_active", hex)?,
                    None => thumb,
                },
            },
            // Order matches DataType::ALL
            types: [
                pair("types.null", &t.null)?,
                pair("types.boolean", &t.boolean)?,
                pair("types.integer", &t.integer)?,
                pair("types.float", &t.float)?,
                pair("types.string", &t.string)?,
                pair("types.date", &t.date)?,
                pair("types.datetime", &t.datetime)?,
            ],
        })
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self> {
        BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| GridError::Other(format!("Unknown builtin theme: {}", id)))
            .and_then(|t| Self::from_yaml(t.yaml))
    }

    /// The embedded light theme
    pub fn light() -> Self {
        Self::from_yaml(LIGHT_YAML).unwrap_or_else(|_| Self::fallback())
    }

    /// The embedded dark theme
    pub fn dark() -> Self {
        Self::from_yaml(DARK_YAML).unwrap_or_else(|_| Self::fallback())
    }

    /// Colors for values of the given column type
    pub fn type_colors(&self, data_type: DataType) -> TypeColors {
        let idx = DataType::ALL
            .iter()
            .position(|t| *t == data_type)
            .unwrap_or(4);
        self.types[idx]
    }

    fn fallback() -> Self {
        let white = Color::rgb(0xFF, 0xFF, 0xFF);
        let ink = Color::rgb(0x24, 0x29, 0x2F);
        let plain = TypeColors {
            background: white,
            foreground: ink,
        };
        Self {
            name: "Fallback".to_string(),
            background: white,
            grid_line: Color::rgb(0xE1, 0xE4, 0xE8),
            header: HeaderTheme {
                background: Color::rgb(0xF3, 0xF4, 0xF6),
                foreground: ink,
                border: Color::rgb(0xC8, 0xCC, 0xD1),
                selected_background: Color::rgb(0xCF, 0xD8, 0xE8),
            },
            gutter: plain,
            overlay: OverlayTheme {
                hover_cell: Color::rgba(0x09, 0x69, 0xDA, 0x22),
                hover_band: Color::rgba(0x09, 0x69, 0xDA, 0x14),
                selection_fill: Color::rgba(0x09, 0x69, 0xDA, 0x33),
                selection_border: Color::rgb(0x09, 0x69, 0xDA),
                selection_band: Color::rgba(0x09, 0x69, 0xDA, 0x1F),
            },
            scrollbar: ScrollbarTheme {
                track: Color::rgb(0xF0, 0xF0, 0xF0),
                thumb: Color::rgb(0xBD, 0xBD, 0xBD),
                thumb_active: Color::rgb(0x8C, 0x95, 0x9F),
            },
            types: [plain; 7],
        }
    }
}

//! Headless grid snapshots
//!
//! Renders a CSV file through the same engine as the window host and
//! writes the composited frame as a PNG.
//!
//! Usage:
//!   cargo run --bin snapshot -- data.csv --out grid.png
//!   cargo run --bin snapshot -- data.csv --select 0 0 4 2 --theme dark

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use gridview::config::GridConfig;
use gridview::controller::GridController;
use gridview::data::load_csv;
use gridview::grid::SelectionRange;
use gridview::theme;

#[derive(Parser, Debug)]
#[command(name = "snapshot", about = "Render a CSV file as a grid PNG")]
struct Args {
    /// CSV or TSV file to render
    input: PathBuf,
    /// Output PNG path
    #[arg(long, default_value = "snapshot.png")]
    out: PathBuf,
    /// Width in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,
    /// Height in pixels
    #[arg(long, default_value_t = 640)]
    height: u32,
    /// Theme id (builtin or user)
    #[arg(long)]
    theme: Option<String>,
    /// TTF/OTF font used for cell text
    #[arg(long)]
    font: Option<PathBuf>,
    /// Selection anchors: start row, start col, end row, end col (-1 = header/gutter)
    #[arg(long, num_args = 4, allow_negative_numbers = true, value_names = ["R0", "C0", "R1", "C1"])]
    select: Option<Vec<i64>>,
    /// First visible row
    #[arg(long, default_value_t = 0)]
    scroll_row: usize,
}

fn save_png(buffer: &[u32], width: u32, height: u32, path: &Path) -> Result<()> {
    // Convert ARGB (0xAARRGGBB) to opaque RGBA bytes
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for &pixel in buffer {
        let r = ((pixel >> 16) & 0xFF) as u8;
        let g = ((pixel >> 8) & 0xFF) as u8;
        let b = (pixel & 0xFF) as u8;
        rgba.extend_from_slice(&[r, g, b, 0xFF]);
    }

    let img = image::ImageBuffer::<image::Rgba<u8>, Vec<u8>>::from_raw(width, height, rgba)
        .context("failed to create image buffer")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    img.save(path)
        .with_context(|| format!("saving PNG to {}", path.display()))?;

    Ok(())
}

fn main() -> Result<()> {
    let _log_guard = gridview::tracing::init(gridview::tracing::LogSetup::CONSOLE);
    let args = Args::parse();

    let mut config = GridConfig::load();
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }
    if let Some(font) = &args.font {
        config.font_path = Some(font.display().to_string());
    }
    let theme = theme::load_theme(&config.theme)
        .with_context(|| format!("loading theme {}", config.theme))?;

    let provider = load_csv(&args.input).with_context(|| format!("loading {}", args.input.display()))?;
    let mut grid = GridController::with_config(Box::new(provider), config, theme, args.width, args.height);
    grid.initialize().context("initializing grid")?;

    if let Some(anchors) = args.select.as_deref() {
        if let [r0, c0, r1, c1] = *anchors {
            grid.select_range(SelectionRange::new(r0, c0, r1, c1));
        }
    }
    if args.scroll_row > 0 {
        let row_height = grid.geometry().row_height as f64;
        grid.scroll_to(0.0, args.scroll_row as f64 * row_height);
    }
    grid.flush().context("rendering grid")?;

    let frame = grid.frame();
    save_png(frame, args.width, args.height, &args.out)?;
    tracing::info!("saved {}", args.out.display());
    Ok(())
}

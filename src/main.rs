//! gridview - open CSV/TSV files as virtualized grids, one tab per file

mod runtime;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use winit::event_loop::EventLoop;

use gridview::config::GridConfig;
use gridview::data::load_csv;
use gridview::theme::{self, Theme};

use runtime::App;

/// A virtualized data grid viewer
#[derive(Parser, Debug)]
#[command(name = "gridview", version, about = "A virtualized data grid viewer")]
struct CliArgs {
    /// CSV or TSV files to open, one tab each
    #[arg(value_name = "PATHS", required_unless_present = "list_themes")]
    paths: Vec<PathBuf>,

    /// Theme id (builtin or user) or path to a theme YAML file
    #[arg(long)]
    theme: Option<String>,

    /// TTF/OTF font used for cell text
    #[arg(long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Print available themes and exit
    #[arg(long)]
    list_themes: bool,
}

fn resolve_theme(spec: &str) -> Theme {
    let path = Path::new(spec);
    let result = if path.is_file() {
        theme::from_file(path)
    } else {
        theme::load_theme(spec)
    };
    result.unwrap_or_else(|e| {
        tracing::warn!("Failed to load theme '{}': {}, using light", spec, e);
        Theme::light()
    })
}

fn main() -> Result<()> {
    let _log_guard = gridview::tracing::init(gridview::tracing::LogSetup::WINDOW);

    let args = CliArgs::parse();

    if args.list_themes {
        for info in theme::list_available_themes() {
            println!("{:<16} {} ({:?})", info.id, info.name, info.source);
        }
        return Ok(());
    }

    let mut config = GridConfig::load();
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    if let Some(font) = args.font {
        config.font_path = Some(font.display().to_string());
    }
    let theme = resolve_theme(&config.theme);

    let datasets = args
        .paths
        .iter()
        .map(|path| load_csv(path).with_context(|| format!("loading {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, theme, datasets);
    event_loop.run_app(&mut app)?;

    Ok(())
}

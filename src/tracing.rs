//! Log setup shared by the `gridview` and `snapshot` binaries
//!
//! The console honours `RUST_LOG` (for example
//! `RUST_LOG=gridview::controller=debug`) and falls back to the binary's
//! default directive. The window host also keeps a debug-level log under
//! `<config>/logs/`, rotated daily.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::ConfigPaths;

const LOG_FILE_PREFIX: &str = "gridview.log";

/// What a binary wants from logging
#[derive(Debug, Clone, Copy)]
pub struct LogSetup {
    /// Console directive used when `RUST_LOG` is unset
    pub console_default: &'static str,
    /// Also write a rotated debug log under the config directory
    pub file: bool,
}

impl LogSetup {
    /// Interactive host: quiet console, debug file log
    pub const WINDOW: Self = Self {
        console_default: "warn",
        file: true,
    };

    /// One-shot tools: console only
    pub const CONSOLE: Self = Self {
        console_default: "info",
        file: false,
    };
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the background file writer.
pub fn init(setup: LogSetup) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(setup.console_default));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let (file_layer, guard) = if setup.file {
        match file_writer() {
            Ok((writer, guard)) => (
                Some(
                    fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true)
                        .with_filter(EnvFilter::new("gridview=debug")),
                ),
                Some(guard),
            ),
            Err(reason) => {
                eprintln!("gridview: file logging disabled: {}", reason);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn file_writer() -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard), String> {
    let paths = ConfigPaths::discover().ok_or("no config directory")?;
    let logs = paths.ensure_logs_dir().map_err(|e| e.to_string())?;
    let appender = tracing_appender::rolling::daily(logs, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

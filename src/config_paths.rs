//! Where gridview keeps its files on disk
//!
//! ```text
//! <root>/config.yaml
//! <root>/themes/<id>.yaml
//! <root>/logs/gridview.log.<date>
//! ```
//!
//! `<root>` is `$GRIDVIEW_CONFIG_DIR` when set, else `$XDG_CONFIG_HOME/gridview`,
//! else the platform config dir from `dirs`.

use std::path::{Path, PathBuf};

use crate::error::{GridError, Result};

const APP_DIR: &str = "gridview";
const ROOT_OVERRIDE: &str = "GRIDVIEW_CONFIG_DIR";

/// Resolved layout of the config directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    root: PathBuf,
}

impl ConfigPaths {
    /// Paths rooted at an explicit directory (tests, portable installs)
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the per-user config directory, if the platform has one
    pub fn discover() -> Option<Self> {
        if let Some(root) = std::env::var_os(ROOT_OVERRIDE).filter(|v| !v.is_empty()) {
            return Some(Self::at(root));
        }
        std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .map(|base| Self::at(base.join(APP_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.root.join("themes")
    }

    /// User theme file for `id`, whether or not it exists
    pub fn theme_file(&self, id: &str) -> PathBuf {
        self.themes_dir().join(format!("{}.yaml", id))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Create the logs directory on demand
    pub fn ensure_logs_dir(&self) -> Result<PathBuf> {
        let logs = self.logs_dir();
        std::fs::create_dir_all(&logs).map_err(|e| {
            GridError::Other(format!("cannot create {}: {}", logs.display(), e))
        })?;
        Ok(logs)
    }
}

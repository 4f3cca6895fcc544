//! Error types for the grid core
//!
//! Provider failures propagate to whoever triggered the fetch. Everything
//! else in the core degrades to "no visible change" or a logged diagnostic,
//! so the variants here are the few things a caller can actually act on.

use crate::data::ProviderWindow;

/// All errors surfaced by the grid core.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The data provider could not produce dataset metadata.
    #[error("metadata unavailable: {0}")]
    Metadata(String),

    /// The data provider failed to fetch a window of values.
    #[error("fetch of rows {}..{}, cols {}..{} failed: {message}", window.row_start, window.row_end, window.col_start, window.col_end)]
    Fetch {
        window: ProviderWindow,
        message: String,
    },

    /// An operation that needs metadata ran before `initialize()`.
    #[error("grid is not initialized")]
    NotInitialized,

    /// No column with the given key exists in the dataset.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// No open tab carries the given dataset name.
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    /// Writing to the system clipboard failed.
    #[error("clipboard: {0}")]
    Clipboard(String),

    /// A theme or config document could not be parsed.
    #[error("YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV export failed.
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for host-supplied messages.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_the_window() {
        let err = GridError::Fetch {
            window: ProviderWindow::new(10, 20, 0, 3),
            message: "disk gone".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "fetch of rows 10..20, cols 0..3 failed: disk gone"
        );
    }
}

//! In-memory data provider
//!
//! Holds every row in a `Vec`. Used by the host binaries after a CSV load
//! and by tests. Requests outside the stored range are clamped.

use super::{CellValue, Column, DataProvider, DatasetMetadata, ProviderWindow, ValueBlock};
use crate::error::Result;

/// A provider backed by owned row vectors
#[derive(Debug, Clone)]
pub struct InMemoryProvider {
    metadata: DatasetMetadata,
    rows: Vec<Vec<CellValue>>,
}

impl InMemoryProvider {
    /// Create a provider; `total_rows` is taken from `rows.len()`
    pub fn new(name: impl Into<String>, columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Self {
        let metadata = DatasetMetadata::new(name, rows.len(), columns);
        Self { metadata, rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }
}

impl DataProvider for InMemoryProvider {
    fn metadata(&self) -> Result<DatasetMetadata> {
        Ok(self.metadata.clone())
    }

    fn fetch(&self, window: ProviderWindow) -> Result<ValueBlock> {
        let row_end = window.row_end.min(self.rows.len());
        let col_end = window.col_end.min(self.metadata.total_columns);
        let row_start = window.row_start.min(row_end);
        let col_start = window.col_start.min(col_end);

        let rows = self.rows[row_start..row_end]
            .iter()
            .map(|row| {
                (col_start..col_end)
                    .map(|c| row.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(ValueBlock::new(
            ProviderWindow::new(row_start, row_end, col_start, col_end),
            rows,
        ))
    }
}

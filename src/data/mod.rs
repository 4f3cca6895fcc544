//! Dataset model and the data provider capability
//!
//! The grid never owns rows. It asks a [`DataProvider`] for metadata once
//! per load and then for bounded rectangular windows of raw values.
//!
//! ```text
//! DataProvider
//! ├── metadata()            -> DatasetMetadata (name, totals, columns)
//! └── fetch(ProviderWindow) -> ValueBlock      (rows × cols, nullable)
//! ```

pub mod csv;
mod memory;

pub use self::csv::{load_csv, parse_csv};
pub use memory::InMemoryProvider;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Declared type of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Null,
    Boolean,
    Integer,
    Float,
    #[default]
    String,
    Date,
    Datetime,
}

impl DataType {
    /// All data types, in declaration order
    pub const ALL: [DataType; 7] = [
        DataType::Null,
        DataType::Boolean,
        DataType::Integer,
        DataType::Float,
        DataType::String,
        DataType::Date,
        DataType::Datetime,
    ];

    /// Whether values of this type are coerced to numbers before formatting
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Whether values of this type are coerced to dates before formatting
    pub fn is_temporal(self) -> bool {
        matches!(self, DataType::Date | DataType::Datetime)
    }
}

/// One column of a dataset. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Unique within a dataset
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "dataType", alias = "data_type")]
    pub data_type: DataType,
    /// Declared length, if the source has one
    #[serde(default)]
    pub length: Option<u32>,
    /// Column-level format spec (symbolic pattern or serialized options)
    #[serde(default)]
    pub format: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            label: None,
            data_type,
            length: None,
            format: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Text shown in the column header
    pub fn header_text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Produced once per load, read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Unique across open datasets
    pub name: String,
    #[serde(rename = "totalRows", alias = "total_rows")]
    pub total_rows: usize,
    #[serde(rename = "totalColumns", alias = "total_columns")]
    pub total_columns: usize,
    pub columns: Vec<Column>,
}

impl DatasetMetadata {
    pub fn new(name: impl Into<String>, total_rows: usize, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            total_rows,
            total_columns: columns.len(),
            columns,
        }
    }

    /// Index of the column with the given key
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }
}

/// A raw, nullable cell value as produced by a provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::DateTime(d)
    }
}

/// A rectangular row/column range requested from a provider.
///
/// Both ends are exclusive: `row_start..row_end`, `col_start..col_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProviderWindow {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl ProviderWindow {
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_end.saturating_sub(self.row_start)
    }

    pub fn col_count(&self) -> usize {
        self.col_end.saturating_sub(self.col_start)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.col_count() == 0
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_start..self.row_end).contains(&row) && (self.col_start..self.col_end).contains(&col)
    }
}

/// A fetched window of raw values, addressed by absolute row/column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueBlock {
    pub window: ProviderWindow,
    /// `rows[r][c]` holds the value at `(window.row_start + r, window.col_start + c)`
    pub rows: Vec<Vec<CellValue>>,
}

impl ValueBlock {
    pub fn new(window: ProviderWindow, rows: Vec<Vec<CellValue>>) -> Self {
        Self { window, rows }
    }

    /// Value at an absolute position, or `None` outside the window
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        if !self.window.contains(row, col) {
            return None;
        }
        self.rows
            .get(row - self.window.row_start)
            .and_then(|r| r.get(col - self.window.col_start))
    }
}

/// External capability the grid consumes for every read.
///
/// Implementations own row storage. The grid only ever asks for bounded
/// windows, except [`crate::controller::GridController::get_column_values`]
/// which fetches one full column for statistics.
pub trait DataProvider {
    /// Dataset name, totals and ordered columns
    fn metadata(&self) -> Result<DatasetMetadata>;

    /// Raw values for `window` (exclusive ends)
    fn fetch(&self, window: ProviderWindow) -> Result<ValueBlock>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_block_uses_absolute_addressing() {
        let block = ValueBlock::new(
            ProviderWindow::new(10, 12, 3, 5),
            vec![
                vec![CellValue::Int(1), CellValue::Int(2)],
                vec![CellValue::Int(3), CellValue::Null],
            ],
        );
        assert_eq!(block.get(10, 3), Some(&CellValue::Int(1)));
        assert_eq!(block.get(11, 4), Some(&CellValue::Null));
        assert_eq!(block.get(12, 3), None);
        assert_eq!(block.get(10, 2), None);
    }

    #[test]
    fn column_metadata_deserializes_from_provider_json() {
        let json = r#"{"name":"Amount","key":"amt","dataType":"float","format":"0.00"}"#;
        let col: Column = serde_json::from_str(json).unwrap();
        assert_eq!(col.key, "amt");
        assert_eq!(col.data_type, DataType::Float);
        assert_eq!(col.format.as_deref(), Some("0.00"));
        assert_eq!(col.header_text(), "Amount");
    }

    #[test]
    fn window_counts_are_exclusive() {
        let w = ProviderWindow::new(5, 5, 0, 4);
        assert!(w.is_empty());
        assert_eq!(ProviderWindow::new(0, 3, 1, 2).row_count(), 3);
    }
}

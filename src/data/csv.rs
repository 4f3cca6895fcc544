//! CSV import into an [`InMemoryProvider`]
//!
//! RFC 4180 parsing via the csv crate. The first record is the header row;
//! column types are inferred from the remaining cells.

use std::io::Cursor;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use super::{CellValue, Column, DataType, InMemoryProvider};
use crate::error::{GridError, Result};
use crate::format::coerce_datetime;

/// Supported CSV delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
        }
    }

    /// Detect delimiter from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "tsv" => Delimiter::Tab,
            "psv" => Delimiter::Pipe,
            _ => Delimiter::Comma,
        }
    }
}

/// Detect delimiter by counting candidates in the first few lines
pub fn detect_delimiter(content: &str) -> Delimiter {
    let first_lines: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

    let comma_count = first_lines.matches(',').count();
    let tab_count = first_lines.matches('\t').count();
    let pipe_count = first_lines.matches('|').count();
    let semi_count = first_lines.matches(';').count();

    let max = comma_count.max(tab_count).max(pipe_count).max(semi_count);

    if max == 0 {
        return Delimiter::Comma;
    }

    if tab_count == max {
        Delimiter::Tab
    } else if pipe_count == max {
        Delimiter::Pipe
    } else if semi_count == max {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}

/// Read a CSV/TSV file; the dataset is named after the file stem
pub fn load_csv(path: &Path) -> Result<InMemoryProvider> {
    let content = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => detect_delimiter(&content),
        Some(ext) => Delimiter::from_extension(ext),
        None => detect_delimiter(&content),
    };
    let provider = parse_csv(&name, &content, delimiter)?;
    tracing::info!(
        "Loaded {} ({} rows, delimiter {:?})",
        path.display(),
        provider.rows().len(),
        delimiter
    );
    Ok(provider)
}

/// Parse delimited text with a header row into a typed provider
pub fn parse_csv(name: &str, content: &str, delimiter: Delimiter) -> Result<InMemoryProvider> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.char() as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(content.as_bytes()));

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|s| s.trim().to_string()).collect(),
        None => return Err(GridError::Other(format!("{}: no header row", name))),
    };

    let mut raw: Vec<Vec<String>> = Vec::new();
    for record in records {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        row.resize(headers.len(), String::new());
        raw.push(row);
    }

    let mut columns = Vec::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let data_type = infer_type(raw.iter().map(|row| row[i].as_str()));
        let label = if header.is_empty() {
            format!("column {}", i + 1)
        } else {
            header.clone()
        };
        // Keys must be unique even when headers repeat
        let key = if columns.iter().any(|c: &Column| c.key == label) {
            format!("{}_{}", label, i + 1)
        } else {
            label.clone()
        };
        columns.push(Column::new(label, data_type).with_key(key));
    }

    let rows = raw
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&columns)
                .map(|(text, column)| parse_cell(&text, column.data_type))
                .collect()
        })
        .collect();

    Ok(InMemoryProvider::new(name, columns, rows))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    coerce_datetime(&CellValue::Text(s.to_string()))
}

/// Narrowest type every non-empty cell parses as
fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> DataType {
    let mut candidates = [
        DataType::Boolean,
        DataType::Integer,
        DataType::Float,
        DataType::Date,
        DataType::Datetime,
    ]
    .to_vec();
    let mut seen = false;

    for cell in cells.map(str::trim).filter(|c| !c.is_empty()) {
        seen = true;
        candidates.retain(|t| match t {
            DataType::Boolean => parse_bool(cell).is_some(),
            DataType::Integer => cell.parse::<i64>().is_ok(),
            DataType::Float => cell.parse::<f64>().is_ok(),
            DataType::Date => parse_date(cell).is_some(),
            DataType::Datetime => parse_datetime(cell).is_some(),
            _ => false,
        });
        if candidates.is_empty() {
            return DataType::String;
        }
    }

    if !seen {
        return DataType::String;
    }
    candidates[0]
}

fn parse_cell(text: &str, data_type: DataType) -> CellValue {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    let parsed = match data_type {
        DataType::Boolean => parse_bool(trimmed).map(CellValue::Bool),
        DataType::Integer => trimmed.parse().ok().map(CellValue::Int),
        DataType::Float => trimmed.parse().ok().map(CellValue::Float),
        DataType::Date => parse_date(trimmed).map(CellValue::Date),
        DataType::Datetime => parse_datetime(trimmed).map(CellValue::DateTime),
        DataType::String | DataType::Null => None,
    };
    parsed.unwrap_or_else(|| CellValue::Text(text.to_string()))
}

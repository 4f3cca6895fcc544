//! Selection export
//!
//! All formats render the same [`SelectedValues`] and differ only in
//! delimiter and escaping:
//!
//! | format   | separator | escaping                      | headers     |
//! |----------|-----------|-------------------------------|-------------|
//! | CSV      | `,`       | RFC 4180 quote doubling       | optional    |
//! | TSV      | tab       | none                          | optional    |
//! | HTML     | `<td>`    | entity escaping               | always      |
//! | Markdown | `\|`      | `\|` escaped, newlines folded | always      |

use std::fmt::Write as _;

use crate::error::{GridError, Result};

/// Display strings for a selection: header labels plus one row of
/// formatted text per selected row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedValues {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SelectedValues {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Html,
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Html => "html",
            ExportFormat::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Emit a header line for CSV/TSV. HTML and Markdown always have one.
    pub include_headers: bool,
}

pub fn export(values: &SelectedValues, format: ExportFormat, options: ExportOptions) -> Result<String> {
    match format {
        ExportFormat::Csv => to_csv(values, options.include_headers),
        ExportFormat::Tsv => Ok(to_tsv(values, options.include_headers)),
        ExportFormat::Html => Ok(to_html(values)),
        ExportFormat::Markdown => Ok(to_markdown(values)),
    }
}

/// Comma-separated, quoting fields with `,`, `"` or line breaks
pub fn to_csv(values: &SelectedValues, include_headers: bool) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    if include_headers {
        writer.write_record(&values.headers)?;
    }
    for row in &values.rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| GridError::Other(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| GridError::Other(e.to_string()))
}

/// Raw tab-separated text, one row per line, no trailing newline
pub fn to_tsv(values: &SelectedValues, include_headers: bool) -> String {
    let mut lines = Vec::with_capacity(values.rows.len() + 1);
    if include_headers {
        lines.push(values.headers.join("\t"));
    }
    lines.extend(values.rows.iter().map(|row| row.join("\t")));
    lines.join("\n")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn to_html(values: &SelectedValues) -> String {
    let mut html = String::from("<table>\n<thead>\n<tr>");
    for header in &values.headers {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &values.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_html(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");
    html
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// GitHub-flavored pipe table
pub fn to_markdown(values: &SelectedValues) -> String {
    let line = |cells: &[String]| {
        let escaped: Vec<String> = cells.iter().map(|c| escape_markdown(c)).collect();
        format!("| {} |", escaped.join(" | "))
    };
    let mut lines = vec![line(&values.headers)];
    lines.push(format!(
        "|{}|",
        vec![" --- "; values.headers.len().max(1)].join("|")
    ));
    lines.extend(values.rows.iter().map(|row| line(row)));
    lines.join("\n")
}

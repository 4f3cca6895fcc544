//! Type-driven value formatting
//!
//! Converts a raw [`CellValue`] plus its [`Column`] into display text and a
//! [`CellStyle`]. The steps, in order:
//!
//! 1. null, or NaN in a numeric column: the configured N/A text, centered
//! 2. booleans: the configured true/false tokens, centered
//! 3. integer/float: coerced to `f64`, locale number format, right-aligned
//! 4. date/datetime: coerced to a datetime, locale date format, right-aligned
//! 5. everything else: the value's text form, left-aligned
//!
//! Format specs resolve column format first, then the option default, then
//! the locale default. Malformed specs fall through silently.

mod date;
mod locale;
mod number;
mod spec;

pub use date::{coerce_datetime, translate_symbolic, DateFormat};
pub use locale::{DateOrder, Locale, DE_DE, EN_GB, EN_US, FR_FR};
pub use number::{format_number, NumberFormat, NumberStyle};
pub use spec::{resolve_date_spec, resolve_number_spec};

use serde::{Deserialize, Serialize};

use crate::data::{CellValue, Column, DataType};
use crate::theme::{Color, Theme, TypeColors};

/// Horizontal placement of text inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Presentation of one formatted cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub align: TextAlign,
    pub background: Color,
    pub foreground: Color,
}

impl CellStyle {
    fn new(align: TextAlign, colors: TypeColors) -> Self {
        Self {
            align,
            background: colors.background,
            foreground: colors.foreground,
        }
    }
}

/// Output of the pipeline for one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedValue {
    pub text: String,
    pub style: CellStyle,
}

/// Formatting options shared by every column of a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub na_text: String,
    pub true_text: String,
    pub false_text: String,
    /// Locale tag, e.g. `en-US`, `de-DE`
    pub locale: String,
    /// Default spec for integer/float columns without their own
    pub number_format: Option<String>,
    /// Default spec for date columns without their own
    pub date_format: Option<String>,
    /// Default spec for datetime columns without their own
    pub datetime_format: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            na_text: "N/A".to_string(),
            true_text: "true".to_string(),
            false_text: "false".to_string(),
            locale: "en-US".to_string(),
            number_format: None,
            date_format: None,
            datetime_format: None,
        }
    }
}

/// A column's spec after resolution
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Number(NumberFormat),
    Date(DateFormat),
    Plain,
}

fn resolve_column(column: &Column, options: &FormatOptions, locale: &Locale) -> Resolved {
    let data_type = column.data_type;
    if data_type.is_numeric() {
        let format = column
            .format
            .as_deref()
            .and_then(resolve_number_spec)
            .or_else(|| options.number_format.as_deref().and_then(resolve_number_spec))
            .unwrap_or_default();
        return Resolved::Number(format);
    }
    if data_type.is_temporal() {
        let with_time = data_type == DataType::Datetime;
        let option_default = if with_time {
            options.datetime_format.as_deref()
        } else {
            options.date_format.as_deref()
        };
        let format = column
            .format
            .as_deref()
            .and_then(|s| resolve_date_spec(s, locale))
            .or_else(|| option_default.and_then(|s| resolve_date_spec(s, locale)))
            .unwrap_or_else(|| DateFormat::locale_default(locale, with_time));
        return Resolved::Date(format);
    }
    Resolved::Plain
}

/// Coerce to a number the way `Number(value)` would. Empty text is not a number.
pub fn coerce_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Int(n) => Some(*n as f64),
        CellValue::Float(f) => Some(*f),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        CellValue::Date(_) | CellValue::DateTime(_) => {
            coerce_datetime(value).map(|dt| dt.and_utc().timestamp_millis() as f64)
        }
        CellValue::Null => None,
    }
}

/// Truthiness for boolean columns
fn coerce_bool(value: &CellValue) -> Option<bool> {
    match value {
        CellValue::Bool(b) => Some(*b),
        CellValue::Int(n) => Some(*n != 0),
        CellValue::Float(f) if !f.is_nan() => Some(*f != 0.0),
        CellValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Text form of a value with no column typing applied
fn raw_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Int(n) => n.to_string(),
        CellValue::Float(f) => f.to_string(),
        CellValue::Text(s) => s.clone(),
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// Per-grid formatter. Resolves each column's spec once, then formats
/// values without further allocation beyond the output text.
#[derive(Debug, Clone)]
pub struct FormatPipeline {
    options: FormatOptions,
    locale: Locale,
    theme: Theme,
    columns: Vec<(DataType, Resolved)>,
}

impl FormatPipeline {
    pub fn new(options: FormatOptions, theme: Theme, columns: &[Column]) -> Self {
        let locale = Locale::from_tag(&options.locale);
        let resolved = columns
            .iter()
            .map(|c| (c.data_type, resolve_column(c, &options, &locale)))
            .collect();
        Self {
            options,
            locale,
            theme,
            columns: resolved,
        }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Format the value of column `col`. Unknown columns are treated as strings.
    pub fn format(&self, value: &CellValue, col: usize) -> FormattedValue {
        match self.columns.get(col) {
            Some((data_type, resolved)) => self.format_typed(value, *data_type, resolved),
            None => self.format_typed(value, DataType::String, &Resolved::Plain),
        }
    }

    fn na(&self) -> FormattedValue {
        FormattedValue {
            text: self.options.na_text.clone(),
            style: CellStyle::new(TextAlign::Center, self.theme.type_colors(DataType::Null)),
        }
    }

    fn boolean(&self, b: bool) -> FormattedValue {
        let text = if b {
            &self.options.true_text
        } else {
            &self.options.false_text
        };
        FormattedValue {
            text: text.clone(),
            style: CellStyle::new(TextAlign::Center, self.theme.type_colors(DataType::Boolean)),
        }
    }

    fn format_typed(&self, value: &CellValue, data_type: DataType, resolved: &Resolved) -> FormattedValue {
        if value.is_null() {
            return self.na();
        }
        let colors = self.theme.type_colors(data_type);
        match (data_type, resolved) {
            (DataType::Boolean, _) => match coerce_bool(value) {
                Some(b) => self.boolean(b),
                None => self.na(),
            },
            (_, Resolved::Number(format)) => match coerce_number(value) {
                Some(n) if n.is_nan() => self.na(),
                Some(n) if n.is_infinite() => FormattedValue {
                    text: if n > 0.0 { "∞" } else { "-∞" }.to_string(),
                    style: CellStyle::new(TextAlign::Right, colors),
                },
                Some(n) => FormattedValue {
                    text: format_number(n, format, &self.locale),
                    style: CellStyle::new(TextAlign::Right, colors),
                },
                None => self.na(),
            },
            (_, Resolved::Date(format)) => match coerce_datetime(value) {
                Some(dt) => FormattedValue {
                    text: format.format(&dt),
                    style: CellStyle::new(TextAlign::Right, colors),
                },
                None => self.na(),
            },
            (_, Resolved::Plain) => match value {
                CellValue::Bool(b) => self.boolean(*b),
                _ => FormattedValue {
                    text: raw_text(value),
                    style: CellStyle::new(TextAlign::Left, colors),
                },
            },
        }
    }
}

/// One-shot formatting of a single value
pub fn format_value(
    value: &CellValue,
    column: &Column,
    options: &FormatOptions,
    theme: &Theme,
) -> FormattedValue {
    let pipeline = FormatPipeline::new(options.clone(), theme.clone(), std::slice::from_ref(column));
    pipeline.format(value, 0)
}

/// Clipboard rendition: empty for null, locale-grouped numbers, ISO dates,
/// raw strings. Ignores column format specs.
pub fn plain_text(value: &CellValue, locale: &Locale) -> String {
    match value {
        CellValue::Int(n) => format_number(*n as f64, &NumberFormat::default(), locale),
        CellValue::Float(f) if f.is_finite() => {
            format_number(*f, &NumberFormat::default(), locale)
        }
        CellValue::Float(f) if f.is_nan() => String::new(),
        _ => raw_text(value),
    }
}

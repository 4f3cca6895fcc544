//! Date and datetime coercion and formatting
//!
//! Raw values are coerced to a `NaiveDateTime` (dates sit at midnight) and
//! rendered through a chrono pattern. Patterns come from symbolic specs
//! (`yyyy-MM-dd HH:mm:ss`), structured options, or the locale default.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use super::locale::{DateOrder, Locale};
use crate::data::CellValue;

/// Exact-match table of common symbolic patterns
const SYMBOLIC_TABLE: &[(&str, &str)] = &[
    ("yyyy-MM-dd", "%Y-%m-%d"),
    ("yyyy-MM-dd HH:mm:ss", "%Y-%m-%d %H:%M:%S"),
    ("yyyy-MM-ddTHH:mm:ss", "%Y-%m-%dT%H:%M:%S"),
    ("dd/MM/yyyy", "%d/%m/%Y"),
    ("MM/dd/yyyy", "%m/%d/%Y"),
    ("dd.MM.yyyy", "%d.%m.%Y"),
    ("yyyy/MM/dd", "%Y/%m/%d"),
    ("HH:mm:ss", "%H:%M:%S"),
    ("HH:mm", "%H:%M"),
];

/// Tokens recognized when decomposing an unknown symbolic pattern.
/// Longer tokens first so `yyyy` wins over `yy`.
const TOKENS: &[(&str, &str)] = &[
    ("yyyy", "%Y"),
    ("yy", "%y"),
    ("MM", "%m"),
    ("dd", "%d"),
    ("HH", "%H"),
    ("mm", "%M"),
    ("ss", "%S"),
];

/// A resolved chrono pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pub pattern: String,
}

impl DateFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Locale default for dates (`with_time == false`) or datetimes
    pub fn locale_default(locale: &Locale, with_time: bool) -> Self {
        if with_time {
            Self::new(locale.datetime_pattern())
        } else {
            Self::new(locale.date_pattern())
        }
    }

    pub fn format(&self, value: &NaiveDateTime) -> String {
        value.format(&self.pattern).to_string()
    }
}

/// Translate a symbolic pattern to chrono: table first, then token by token.
/// Returns `None` when nothing in the string is a recognized token.
pub fn translate_symbolic(spec: &str) -> Option<DateFormat> {
    if let Some((_, pattern)) = SYMBOLIC_TABLE.iter().find(|(s, _)| *s == spec) {
        return Some(DateFormat::new(*pattern));
    }

    let mut out = String::with_capacity(spec.len() * 2);
    let mut rest = spec;
    let mut matched_any = false;
    while !rest.is_empty() {
        if let Some((token, pattern)) = TOKENS.iter().find(|(t, _)| rest.starts_with(t)) {
            out.push_str(pattern);
            rest = &rest[token.len()..];
            matched_any = true;
            continue;
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        if ch.is_ascii_alphabetic() {
            // Unknown letter tokens (e.g. `EEEE`) make the pattern unrecognized
            return None;
        }
        if ch == '%' {
            out.push_str("%%");
        } else {
            out.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }

    matched_any.then(|| DateFormat::new(out))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
enum FieldWidth {
    #[serde(rename = "numeric")]
    Numeric,
    #[serde(rename = "2-digit")]
    TwoDigit,
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "long")]
    Long,
}

/// Serialized structured options (`{"year":"numeric","month":"2-digit",...}`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DateFormatOptions {
    #[serde(default)]
    year: Option<FieldWidth>,
    #[serde(default)]
    month: Option<FieldWidth>,
    #[serde(default)]
    day: Option<FieldWidth>,
    #[serde(default)]
    hour: Option<FieldWidth>,
    #[serde(default)]
    minute: Option<FieldWidth>,
    #[serde(default)]
    second: Option<FieldWidth>,
}

impl DateFormatOptions {
    pub(crate) fn resolve(&self, locale: &Locale) -> Option<DateFormat> {
        let year = self.year.map(|w| match w {
            FieldWidth::TwoDigit => "%y",
            _ => "%Y",
        });
        let month = self.month.map(|w| match w {
            FieldWidth::Numeric => "%-m",
            FieldWidth::TwoDigit => "%m",
            FieldWidth::Short => "%b",
            FieldWidth::Long => "%B",
        });
        let day = self.day.map(|w| match w {
            FieldWidth::Numeric => "%-d",
            _ => "%d",
        });
        let numeric = |w: FieldWidth, padded: &'static str, bare: &'static str| match w {
            FieldWidth::Numeric => bare,
            _ => padded,
        };
        let hour = self.hour.map(|w| numeric(w, "%H", "%-H"));
        let minute = self.minute.map(|_| "%M");
        let second = self.second.map(|_| "%S");

        let date_fields: Vec<&str> = match locale.date_order {
            DateOrder::MonthDayYear => [month, day, year],
            DateOrder::DayMonthYear => [day, month, year],
        }
        .into_iter()
        .flatten()
        .collect();
        let time_fields: Vec<&str> = [hour, minute, second].into_iter().flatten().collect();

        if date_fields.is_empty() && time_fields.is_empty() {
            return None;
        }

        let textual_month = matches!(self.month, Some(FieldWidth::Short | FieldWidth::Long));
        let date_sep = if textual_month {
            " ".to_string()
        } else {
            locale.date_separator.to_string()
        };
        let date_part = date_fields.join(&date_sep);
        let time_part = time_fields.join(":");

        let pattern = match (date_part.is_empty(), time_part.is_empty()) {
            (false, false) => format!("{date_part}, {time_part}"),
            (false, true) => date_part,
            (true, _) => time_part,
        };
        Some(DateFormat::new(pattern))
    }
}

/// Coerce a raw value to a datetime the way `new Date(value)` would.
///
/// Numbers are epoch milliseconds; text accepts ISO-like forms.
pub fn coerce_datetime(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::Date(d) => Some(d.and_time(NaiveTime::MIN)),
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Int(ms) => DateTime::from_timestamp_millis(*ms).map(|d| d.naive_utc()),
        CellValue::Float(ms) if ms.is_finite() => {
            DateTime::from_timestamp_millis(ms.trunc() as i64).map(|d| d.naive_utc())
        }
        CellValue::Text(s) => parse_datetime_text(s.trim()),
        _ => None,
    }
}

fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::locale::{DE_DE, EN_US};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_symbolic_table_hit() {
        let f = translate_symbolic("yyyy-MM-dd HH:mm:ss").unwrap();
        assert_eq!(f.format(&at(2024, 3, 9, 7, 5, 1)), "2024-03-09 07:05:01");
    }

    #[test]
    fn test_symbolic_decomposition() {
        let f = translate_symbolic("dd-MM-yy @ HH.mm").unwrap();
        assert_eq!(f.pattern, "%d-%m-%y @ %H.%M");
        assert_eq!(f.format(&at(2024, 12, 31, 23, 59, 0)), "31-12-24 @ 23.59");
    }

    #[test]
    fn test_symbolic_unrecognized() {
        assert!(translate_symbolic("EEEE, d MMMM").is_none());
        assert!(translate_symbolic("---").is_none());
        assert!(translate_symbolic("").is_none());
    }

    #[test]
    fn test_percent_is_escaped() {
        let f = translate_symbolic("yyyy%").unwrap();
        assert_eq!(f.format(&at(2020, 1, 1, 0, 0, 0)), "2020%");
    }

    #[test]
    fn test_structured_options_follow_locale_order() {
        let opts: DateFormatOptions =
            serde_json::from_str(r#"{"year":"numeric","month":"2-digit","day":"2-digit"}"#)
                .unwrap();
        let us = opts.resolve(&EN_US).unwrap();
        let de = opts.resolve(&DE_DE).unwrap();
        let d = at(2024, 1, 5, 0, 0, 0);
        assert_eq!(us.format(&d), "01/05/2024");
        assert_eq!(de.format(&d), "05.01.2024");
    }

    #[test]
    fn test_structured_time_only() {
        let opts: DateFormatOptions =
            serde_json::from_str(r#"{"hour":"2-digit","minute":"2-digit"}"#).unwrap();
        let f = opts.resolve(&EN_US).unwrap();
        assert_eq!(f.format(&at(2024, 1, 5, 9, 7, 0)), "09:07");
    }

    #[test]
    fn test_coerce_values() {
        let midnight = at(2024, 2, 29, 0, 0, 0);
        assert_eq!(
            coerce_datetime(&CellValue::Text("2024-02-29".into())),
            Some(midnight)
        );
        assert_eq!(
            coerce_datetime(&CellValue::Int(midnight.and_utc().timestamp_millis())),
            Some(midnight)
        );
        assert_eq!(
            coerce_datetime(&CellValue::Text("2024-02-29T10:30:00Z".into())),
            Some(at(2024, 2, 29, 10, 30, 0))
        );
        assert_eq!(coerce_datetime(&CellValue::Text("soon".into())), None);
        assert_eq!(coerce_datetime(&CellValue::Bool(true)), None);
    }
}

//! Locale-aware number formatting
//!
//! Covers the subset of `Intl.NumberFormat`-style options the grid accepts
//! in format specs: fraction digit bounds, grouping, percent and currency.

use serde::Deserialize;

use super::locale::Locale;

/// How the number is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
    #[default]
    Decimal,
    Percent,
    Currency,
}

/// Resolved numeric format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub min_fraction_digits: usize,
    pub max_fraction_digits: usize,
    pub use_grouping: bool,
    pub style: NumberStyle,
    /// ISO 4217 code for `NumberStyle::Currency`
    pub currency: Option<String>,
}

impl Default for NumberFormat {
    /// The locale default: grouped, up to three fraction digits
    fn default() -> Self {
        Self {
            min_fraction_digits: 0,
            max_fraction_digits: 3,
            use_grouping: true,
            style: NumberStyle::Decimal,
            currency: None,
        }
    }
}

/// Serialized structured options, as they appear in a format spec
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct NumberFormatOptions {
    #[serde(default)]
    minimum_fraction_digits: Option<usize>,
    #[serde(default)]
    maximum_fraction_digits: Option<usize>,
    #[serde(default)]
    use_grouping: Option<bool>,
    #[serde(default)]
    style: Option<NumberStyle>,
    #[serde(default)]
    currency: Option<String>,
}

/// Fraction digits are capped so `format!("{:.*}")` stays reasonable
const MAX_FRACTION_DIGITS: usize = 20;

impl NumberFormatOptions {
    pub(crate) fn resolve(self) -> Option<NumberFormat> {
        let style = self.style.unwrap_or_default();
        if style == NumberStyle::Currency && self.currency.is_none() {
            return None;
        }
        let default_max = match style {
            NumberStyle::Currency => 2,
            NumberStyle::Percent => 0,
            NumberStyle::Decimal => 3,
        };
        let min = self.minimum_fraction_digits.unwrap_or(match style {
            NumberStyle::Currency => 2,
            _ => 0,
        });
        let max = self.maximum_fraction_digits.unwrap_or(default_max.max(min));
        if min > max || max > MAX_FRACTION_DIGITS {
            return None;
        }
        Some(NumberFormat {
            min_fraction_digits: min,
            max_fraction_digits: max,
            use_grouping: self.use_grouping.unwrap_or(true),
            style,
            currency: self.currency.map(|c| c.to_ascii_uppercase()),
        })
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

/// Insert the locale group separator every three integer digits
fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Format a finite number. Callers handle NaN/infinity before this point.
pub fn format_number(value: f64, format: &NumberFormat, locale: &Locale) -> String {
    let scaled = match format.style {
        NumberStyle::Percent => value * 100.0,
        _ => value,
    };

    let fixed = format!("{:.*}", format.max_fraction_digits, scaled.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (fixed.clone(), String::new()),
    };

    // Trim optional trailing zeros down to the minimum
    let mut frac = frac_part;
    while frac.len() > format.min_fraction_digits && frac.ends_with('0') {
        frac.pop();
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac.chars().all(|c| c == '0');
    let negative = scaled.is_sign_negative() && !is_zero;

    let int_text = if format.use_grouping {
        group_digits(&int_part, locale.group)
    } else {
        int_part
    };

    let mut number = String::new();
    if negative {
        number.push('-');
    }
    number.push_str(&int_text);
    if !frac.is_empty() {
        number.push(locale.decimal);
        number.push_str(&frac);
    }

    match format.style {
        NumberStyle::Decimal => number,
        NumberStyle::Percent => {
            if locale.currency_suffix {
                format!("{number}\u{00A0}%")
            } else {
                format!("{number}%")
            }
        }
        NumberStyle::Currency => {
            let code = format.currency.as_deref().unwrap_or("USD");
            match (currency_symbol(code), locale.currency_suffix) {
                (Some(sym), false) => match number.strip_prefix('-') {
                    Some(rest) => format!("-{sym}{rest}"),
                    None => format!("{sym}{number}"),
                },
                (Some(sym), true) => format!("{number}\u{00A0}{sym}"),
                (None, _) => format!("{code}\u{00A0}{number}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::locale::{DE_DE, EN_US};

    fn fixed(min: usize, max: usize, grouping: bool) -> NumberFormat {
        NumberFormat {
            min_fraction_digits: min,
            max_fraction_digits: max,
            use_grouping: grouping,
            ..NumberFormat::default()
        }
    }

    #[test]
    fn test_default_groups_and_trims() {
        let f = NumberFormat::default();
        assert_eq!(format_number(1234567.5, &f, &EN_US), "1,234,567.5");
        assert_eq!(format_number(42.0, &f, &EN_US), "42");
        assert_eq!(format_number(0.1234, &f, &EN_US), "0.123");
        assert_eq!(format_number(-999.0, &f, &EN_US), "-999");
    }

    #[test]
    fn test_fixed_fraction_digits() {
        assert_eq!(format_number(3.0, &fixed(2, 2, false), &EN_US), "3.00");
        assert_eq!(format_number(1234.5, &fixed(2, 2, true), &DE_DE), "1.234,50");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format_number(-0.0001, &fixed(0, 2, false), &EN_US), "0");
    }

    #[test]
    fn test_percent_and_currency() {
        let pct = NumberFormat {
            style: NumberStyle::Percent,
            ..fixed(0, 1, true)
        };
        assert_eq!(format_number(0.256, &pct, &EN_US), "25.6%");

        let usd = NumberFormat {
            style: NumberStyle::Currency,
            currency: Some("USD".into()),
            ..fixed(2, 2, true)
        };
        assert_eq!(format_number(-1234.5, &usd, &EN_US), "-$1,234.50");

        let eur = NumberFormat {
            style: NumberStyle::Currency,
            currency: Some("EUR".into()),
            ..fixed(2, 2, true)
        };
        assert_eq!(format_number(12.5, &eur, &DE_DE), "12,50\u{00A0}€");
    }

    #[test]
    fn test_options_resolution() {
        let opts: NumberFormatOptions =
            serde_json::from_str(r#"{"minimumFractionDigits":2,"maximumFractionDigits":1}"#)
                .unwrap();
        assert!(opts.resolve().is_none(), "min > max must be rejected");

        let opts: NumberFormatOptions =
            serde_json::from_str(r#"{"style":"currency","currency":"gbp"}"#).unwrap();
        let f = opts.resolve().unwrap();
        assert_eq!(f.currency.as_deref(), Some("GBP"));
        assert_eq!(f.min_fraction_digits, 2);
    }
}

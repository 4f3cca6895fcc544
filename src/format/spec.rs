//! Format-spec resolution
//!
//! A spec is either serialized structured options (`{"maximumFractionDigits":2}`)
//! or a symbolic pattern (`#,##0.00`, `yyyy-MM-dd`). Symbolic patterns hit
//! a fixed table first and are decomposed token by token otherwise. Anything
//! unrecognized resolves to `None` so the caller can move to the next source.

use super::date::{translate_symbolic, DateFormat, DateFormatOptions};
use super::locale::Locale;
use super::number::{NumberFormat, NumberFormatOptions, NumberStyle};

fn is_structured(spec: &str) -> bool {
    spec.starts_with('{')
}

fn numeric(min: usize, max: usize, grouping: bool, style: NumberStyle) -> NumberFormat {
    NumberFormat {
        min_fraction_digits: min,
        max_fraction_digits: max,
        use_grouping: grouping,
        style,
        currency: None,
    }
}

fn number_table(spec: &str) -> Option<NumberFormat> {
    let format = match spec {
        "0" => numeric(0, 0, false, NumberStyle::Decimal),
        "0.00" => numeric(2, 2, false, NumberStyle::Decimal),
        "#,##0" => numeric(0, 0, true, NumberStyle::Decimal),
        "#,##0.00" => numeric(2, 2, true, NumberStyle::Decimal),
        "0%" => numeric(0, 0, false, NumberStyle::Percent),
        "0.00%" => numeric(2, 2, false, NumberStyle::Percent),
        _ => return None,
    };
    Some(format)
}

/// `#,##0.0#` style patterns: grouping from `,`, required digits from `0`,
/// optional digits from `#`, trailing `%` for percent
fn decompose_number(spec: &str) -> Option<NumberFormat> {
    let (body, style) = match spec.strip_suffix('%') {
        Some(body) => (body, NumberStyle::Percent),
        None => (spec, NumberStyle::Decimal),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };

    let int_ok = !int_part.is_empty()
        && int_part.chars().all(|c| matches!(c, '0' | '#' | ','))
        && int_part.chars().any(|c| matches!(c, '0' | '#'));
    if !int_ok || !frac_part.chars().all(|c| matches!(c, '0' | '#')) {
        return None;
    }

    // Required digits must precede optional ones
    let required = frac_part.chars().take_while(|&c| c == '0').count();
    if frac_part[required..].contains('0') {
        return None;
    }

    Some(numeric(
        required,
        frac_part.len(),
        int_part.contains(','),
        style,
    ))
}

/// Resolve a numeric spec, or `None` when it is malformed
pub fn resolve_number_spec(spec: &str) -> Option<NumberFormat> {
    let spec = spec.trim();
    if spec.is_empty() {
        return None;
    }
    if is_structured(spec) {
        return serde_json::from_str::<NumberFormatOptions>(spec)
            .ok()
            .and_then(NumberFormatOptions::resolve);
    }
    number_table(spec).or_else(|| decompose_number(spec))
}

/// Resolve a date spec, or `None` when it is malformed
pub fn resolve_date_spec(spec: &str, locale: &Locale) -> Option<DateFormat> {
    let spec = spec.trim();
    if spec.is_empty() {
        return None;
    }
    if is_structured(spec) {
        return serde_json::from_str::<DateFormatOptions>(spec)
            .ok()
            .and_then(|opts| opts.resolve(locale));
    }
    translate_symbolic(spec)
}

//! Locale conventions for number and date rendering
//!
//! Only the handful of conventions the grid needs: separators, currency
//! placement, default date ordering. Unknown tags resolve to `en-US`.

/// Ordering of day/month/year in numeric dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// 1/31/2024
    MonthDayYear,
    /// 31/01/2024
    DayMonthYear,
}

/// Number and date conventions for one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub tag: &'static str,
    pub decimal: char,
    pub group: char,
    pub date_order: DateOrder,
    pub date_separator: char,
    /// Currency symbol goes after the number ("12,50 €")
    pub currency_suffix: bool,
}

pub const EN_US: Locale = Locale {
    tag: "en-US",
    decimal: '.',
    group: ',',
    date_order: DateOrder::MonthDayYear,
    date_separator: '/',
    currency_suffix: false,
};

pub const EN_GB: Locale = Locale {
    tag: "en-GB",
    decimal: '.',
    group: ',',
    date_order: DateOrder::DayMonthYear,
    date_separator: '/',
    currency_suffix: false,
};

pub const DE_DE: Locale = Locale {
    tag: "de-DE",
    decimal: ',',
    group: '.',
    date_order: DateOrder::DayMonthYear,
    date_separator: '.',
    currency_suffix: true,
};

pub const FR_FR: Locale = Locale {
    tag: "fr-FR",
    decimal: ',',
    group: '\u{202F}',
    date_order: DateOrder::DayMonthYear,
    date_separator: '/',
    currency_suffix: true,
};

const LOCALES: &[Locale] = &[EN_US, EN_GB, DE_DE, FR_FR];

impl Default for Locale {
    fn default() -> Self {
        EN_US
    }
}

impl Locale {
    /// Resolve a BCP-47-ish tag (`de-DE`, `de_de`, `de`), falling back to en-US
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        LOCALES
            .iter()
            .find(|l| l.tag.to_ascii_lowercase() == normalized)
            .or_else(|| {
                let lang = normalized.split('-').next().unwrap_or_default();
                LOCALES
                    .iter()
                    .find(|l| l.tag.to_ascii_lowercase().starts_with(lang) && !lang.is_empty())
            })
            .copied()
            .unwrap_or_default()
    }

    /// chrono pattern for a plain numeric date in this locale
    pub fn date_pattern(&self) -> String {
        let sep = self.date_separator;
        match self.date_order {
            DateOrder::MonthDayYear => format!("%-m{sep}%-d{sep}%Y"),
            DateOrder::DayMonthYear => format!("%d{sep}%m{sep}%Y"),
        }
    }

    /// chrono pattern for a date with time of day
    pub fn datetime_pattern(&self) -> String {
        format!("{}, %H:%M:%S", self.date_pattern())
    }
}

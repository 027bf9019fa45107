//! Month-year tokens as produced by the date picker ("enero 2020", "March 2021").
//!
//! The core never sees raw dates from the picker, only these formatted strings.
//! Parsing is restricted to a fixed month vocabulary so that chronological
//! comparisons are possible; anything outside it is treated as unparseable.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::locale::Locale;

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Tokens that mark an experience as ongoing.
const CURRENT_MARKERS: &[&str] = &["current", "actual", "present", "presente"];

/// Earliest graduation year accepted by the education form.
pub const MIN_GRADUATION_YEAR: i32 = 1950;

/// A calendar month. Ordering is chronological (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthYear {
    pub year: i32,
    pub month: u32,
}

impl MonthYear {
    /// Parses `"<month> <year>"`, with an optional `de`/`of` connector
    /// (`"enero de 2020"`). Month names are matched case-insensitively
    /// against the Spanish and English vocabularies.
    pub fn parse(token: &str) -> Option<Self> {
        let parts: Vec<&str> = token.split_whitespace().collect();
        let (month_name, year_str) = match parts.as_slice() {
            [m, y] => (*m, *y),
            [m, connector, y] if matches!(connector.to_lowercase().as_str(), "de" | "of") => {
                (*m, *y)
            }
            _ => return None,
        };

        let month = month_index(month_name)?;
        if year_str.len() != 4 || !year_str.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year = year_str.parse().ok()?;
        Some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

fn month_index(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    SPANISH_MONTHS
        .iter()
        .position(|m| *m == lower)
        .or_else(|| ENGLISH_MONTHS.iter().position(|m| *m == lower))
        .map(|i| i as u32 + 1)
}

/// True when an end-date value means "still working here": empty, or one of
/// the sentinel words.
pub fn is_current_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || CURRENT_MARKERS
            .iter()
            .any(|m| m.eq_ignore_ascii_case(trimmed))
}

/// Formats a date the way the picker hands it to the forms: capitalized
/// month name followed by the year.
pub fn format_month_year(date: NaiveDate, locale: Locale) -> String {
    let idx = date.month0() as usize;
    let name = match locale {
        Locale::Es => SPANISH_MONTHS[idx],
        Locale::En => ENGLISH_MONTHS[idx],
    };
    let mut chars = name.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{capitalized} {}", date.year())
}

pub fn format_year(date: NaiveDate) -> String {
    date.year().to_string()
}

/// Selection limits a date picker should enforce for a given field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl DateBounds {
    pub fn permits(&self, date: NaiveDate) -> bool {
        self.min.map_or(true, |min| date >= min) && self.max.map_or(true, |max| date <= max)
    }

    pub fn experience_start(today: NaiveDate) -> Self {
        Self {
            min: None,
            max: Some(today),
        }
    }

    /// End date may not precede the chosen start month, when that parses.
    pub fn experience_end(start_date: &str, today: NaiveDate) -> Self {
        Self {
            min: MonthYear::parse(start_date).and_then(MonthYear::first_day),
            max: Some(today),
        }
    }

    pub fn graduation(today: NaiveDate) -> Self {
        Self {
            min: NaiveDate::from_ymd_opt(MIN_GRADUATION_YEAR, 1, 1),
            max: Some(today),
        }
    }
}

use chrono::{Datelike, Days, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::trace;

/// Day zero of the spreadsheet-serial convention.
/// Serial 1 is 1899-12-31, so 60 lands on 1900-02-28 and the phantom
/// 1900-02-29 never appears.
pub static SERIAL_EPOCH: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch"));

static NOT_DATE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9/]").expect("valid regex"));

/// A date cell before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDate {
    /// Day count from [`SERIAL_EPOCH`].
    Serial(f64),
    Text(String),
    /// Booleans, error cells, blanks.
    Other,
}

/// Outcome of date normalization. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedDate {
    Date(NaiveDate),
    Unparseable,
}

impl NormalizedDate {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            NormalizedDate::Date(d) => Some(*d),
            NormalizedDate::Unparseable => None,
        }
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, NormalizedDate::Unparseable)
    }
}

#[derive(Debug, Error, PartialEq)]
enum DateParseError {
    #[error("serial day count {0} is not a finite number")]
    NonFinite(f64),
    #[error("serial day count {0} is outside the calendar range")]
    OutOfRange(f64),
    #[error("no digits left after cleaning {0:?}")]
    Empty(String),
    #[error("{0:?} is not a day/month/year date")]
    Shape(String),
    #[error("{0:?} names no valid calendar day")]
    InvalidDay(String),
    #[error("not a date value")]
    UnsupportedKind,
}

/// Turn any raw date cell into a calendar date, or `Unparseable`.
pub fn normalize_date(raw: &RawDate) -> NormalizedDate {
    match parse_raw_date(raw) {
        Ok(date) => NormalizedDate::Date(date),
        Err(e) => {
            trace!(?raw, reason = %e, "unparseable date");
            NormalizedDate::Unparseable
        }
    }
}

fn parse_raw_date(raw: &RawDate) -> Result<NaiveDate, DateParseError> {
    match raw {
        RawDate::Serial(days) => serial_to_date(*days),
        RawDate::Text(text) => parse_day_first(text, Utc::now().year()),
        RawDate::Other => Err(DateParseError::UnsupportedKind),
    }
}

/// Serial day count → date. A fractional part is a time of day and is dropped.
fn serial_to_date(days: f64) -> Result<NaiveDate, DateParseError> {
    if !days.is_finite() {
        return Err(DateParseError::NonFinite(days));
    }
    let whole = days.floor();
    // chrono tops out around ±262k years
    if whole.abs() > 90_000_000.0 {
        return Err(DateParseError::OutOfRange(days));
    }
    let whole = whole as i64;
    let shifted = if whole >= 0 {
        SERIAL_EPOCH.checked_add_days(Days::new(whole as u64))
    } else {
        SERIAL_EPOCH.checked_sub_days(Days::new(whole.unsigned_abs()))
    };
    shifted.ok_or(DateParseError::OutOfRange(days))
}

/// Strip everything but digits and `/`, then read day/month/year.
///
/// `reference_year` anchors two-digit years.
fn parse_day_first(text: &str, reference_year: i32) -> Result<NaiveDate, DateParseError> {
    let cleaned = NOT_DATE_CHARS.replace_all(text.trim(), "");
    if cleaned.is_empty() {
        return Err(DateParseError::Empty(text.to_string()));
    }

    let parts: Vec<&str> = cleaned.split('/').collect();
    match parts.as_slice() {
        [compact] if compact.len() == 8 => {
            let y = num(&compact[0..4], text)?;
            let m = num(&compact[4..6], text)?;
            let d = num(&compact[6..8], text)?;
            ymd(y as i32, m, d).ok_or_else(|| DateParseError::InvalidDay(text.to_string()))
        }
        [y, m, d] if y.len() == 4 && m.len() <= 2 && d.len() <= 2 && !m.is_empty() && !d.is_empty() => {
            ymd(num(y, text)? as i32, num(m, text)?, num(d, text)?)
                .ok_or_else(|| DateParseError::InvalidDay(text.to_string()))
        }
        [a, b, y] if (1..=2).contains(&a.len()) && (1..=2).contains(&b.len()) => {
            let year = match y.len() {
                4 => num(y, text)? as i32,
                1 | 2 => pivot_two_digit_year(num(y, text)?, reference_year),
                _ => return Err(DateParseError::Shape(text.to_string())),
            };
            let (a, b) = (num(a, text)?, num(b, text)?);
            // day first; month first only when day first names no real day
            ymd(year, b, a)
                .or_else(|| ymd(year, a, b))
                .ok_or_else(|| DateParseError::InvalidDay(text.to_string()))
        }
        _ => Err(DateParseError::Shape(text.to_string())),
    }
}

/// Two-digit year → the year within 50 years of `reference_year`.
pub fn pivot_two_digit_year(yy: u32, reference_year: i32) -> i32 {
    let century = reference_year.div_euclid(100) * 100;
    let mut year = century + yy as i32;
    if year >= reference_year + 50 {
        year -= 100;
    } else if year < reference_year - 50 {
        year += 100;
    }
    year
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn num(s: &str, original: &str) -> Result<u32, DateParseError> {
    s.parse()
        .map_err(|_| DateParseError::Shape(original.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(s: &str) -> NormalizedDate {
        normalize_date(&RawDate::Text(s.to_string()))
    }

    #[test]
    fn test_serial_counts_from_epoch() {
        for n in [0u32, 1, 59, 60, 61, 366, 45_366, 100_000] {
            let got = normalize_date(&RawDate::Serial(n as f64));
            let want = date(1899, 12, 30) + Days::new(n as u64);
            assert_eq!(got, NormalizedDate::Date(want), "serial {}", n);
        }
    }

    #[test]
    fn test_serial_known_values() {
        assert_eq!(serial_to_date(45_366.0), Ok(date(2024, 3, 15)));
        assert_eq!(serial_to_date(1.0), Ok(date(1899, 12, 31)));
        assert_eq!(serial_to_date(61.0), Ok(date(1900, 3, 1)));
    }

    #[test]
    fn test_serial_fraction_keeps_the_day() {
        assert_eq!(serial_to_date(45_366.75), Ok(date(2024, 3, 15)));
        assert_eq!(serial_to_date(-0.5), Ok(date(1899, 12, 29)));
    }

    #[test]
    fn test_serial_non_finite_or_huge() {
        assert_eq!(
            normalize_date(&RawDate::Serial(f64::NAN)),
            NormalizedDate::Unparseable
        );
        assert_eq!(
            normalize_date(&RawDate::Serial(f64::INFINITY)),
            NormalizedDate::Unparseable
        );
        assert_eq!(
            normalize_date(&RawDate::Serial(1e15)),
            NormalizedDate::Unparseable
        );
    }

    #[test]
    fn test_day_first_text() {
        assert_eq!(text("15/03/2024"), NormalizedDate::Date(date(2024, 3, 15)));
        assert_eq!(text("05/04/2024"), NormalizedDate::Date(date(2024, 4, 5)));
        assert_eq!(text("5/4/2024"), NormalizedDate::Date(date(2024, 4, 5)));
    }

    #[test]
    fn test_noise_is_stripped() {
        assert_eq!(text(" 15/03/2024 "), NormalizedDate::Date(date(2024, 3, 15)));
        assert_eq!(text("'15/03/2024"), NormalizedDate::Date(date(2024, 3, 15)));
        assert_eq!(text("15 /03/ 2024h"), NormalizedDate::Date(date(2024, 3, 15)));
    }

    #[test]
    fn test_month_first_when_day_first_impossible() {
        assert_eq!(text("03/15/2024"), NormalizedDate::Date(date(2024, 3, 15)));
    }

    #[test]
    fn test_year_first_and_compact() {
        assert_eq!(text("2024/03/15"), NormalizedDate::Date(date(2024, 3, 15)));
        assert_eq!(text("20240315"), NormalizedDate::Date(date(2024, 3, 15)));
    }

    #[test]
    fn test_two_digit_years() {
        assert_eq!(
            parse_day_first("15/03/24", 2026),
            Ok(date(2024, 3, 15))
        );
        assert_eq!(
            parse_day_first("15/03/99", 2026),
            Ok(date(1999, 3, 15))
        );
        assert_eq!(pivot_two_digit_year(75, 2026), 2075);
        assert_eq!(pivot_two_digit_year(76, 2026), 1976);
    }

    #[test]
    fn test_unparseable_text() {
        assert_eq!(text("not-a-date"), NormalizedDate::Unparseable);
        assert_eq!(text(""), NormalizedDate::Unparseable);
        assert_eq!(text("31/02/2024"), NormalizedDate::Unparseable);
        assert_eq!(text("15-03-2024"), NormalizedDate::Unparseable);
        assert_eq!(text("1/2/3/4"), NormalizedDate::Unparseable);
        assert_eq!(text("15/03/202"), NormalizedDate::Unparseable);
        assert_eq!(text("//"), NormalizedDate::Unparseable);
    }

    #[test]
    fn test_error_reasons() {
        assert_eq!(
            parse_day_first("abc", 2026),
            Err(DateParseError::Empty("abc".to_string()))
        );
        assert_eq!(
            parse_day_first("32/13/2024", 2026),
            Err(DateParseError::InvalidDay("32/13/2024".to_string()))
        );
        assert_eq!(
            parse_raw_date(&RawDate::Other),
            Err(DateParseError::UnsupportedKind)
        );
    }

    #[test]
    fn test_other_kinds_are_unparseable() {
        let got = normalize_date(&RawDate::Other);
        assert!(got.is_unparseable());
        assert_eq!(got.as_date(), None);
    }
}

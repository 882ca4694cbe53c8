//! Input checks applied to prompt answers before they reach storage.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})\.([0-9]{2})\.([0-9]{4})$").expect("valid date regex"));
static NON_NEGATIVE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("valid number regex"));
static NON_NEGATIVE_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid integer regex"));

/// Splits a strict `DD.MM.YYYY` string into `(day, month, year)`.
///
/// Only the shape is checked here; calendar validity is left to the caller.
pub(crate) fn split_date(s: &str) -> Option<(u32, u32, i32)> {
    let caps = DATE_SHAPE.captures(s)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    Some((day, month, year))
}

/// Returns true when `s` is exactly `DD.MM.YYYY` and names a real calendar day.
///
/// Single-digit days or months are rejected rather than padded.
pub fn is_valid_date(s: &str) -> bool {
    match split_date(s) {
        Some((day, month, year)) => NaiveDate::from_ymd_opt(year, month, day).is_some(),
        None => false,
    }
}

/// Accepts ASCII `123` and `12.5`; rejects signs, blanks and anything non-numeric.
pub fn is_non_negative_number(s: &str) -> bool {
    NON_NEGATIVE_NUMBER.is_match(s)
}

/// Like [`is_non_negative_number`] without a fractional part. Used for seat counts.
pub fn is_non_negative_integer(s: &str) -> bool {
    NON_NEGATIVE_INTEGER.is_match(s)
}

//! Conversion between the `DD.MM.YYYY` form users type and the ISO form stored in SQLite.

use crate::error::{Result, RouteError};
use crate::validation::split_date;

/// Turns `dd.mm.yyyy` into `yyyy-mm-dd`.
///
/// Input that does not have the expected shape is an error, never a
/// half-parsed date.
pub fn convert_to_sqlite_format(date: &str) -> Result<String> {
    let (day, month, year) =
        split_date(date).ok_or_else(|| RouteError::InvalidDate(date.to_string()))?;
    Ok(format!("{year:04}-{month:02}-{day:02}"))
}

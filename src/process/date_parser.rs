use chrono::NaiveDate;

use crate::process::error::PrepareError;
use crate::process::utils::clean_str;

/// Strict `"YYYY-MM-DD"` → NaiveDate.
///
/// The shape is checked before handing off to chrono, so unpadded or
/// reordered forms such as `2019-3-5` or `15/03/2019` are rejected.
pub fn parse_ymd(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    let digits_ok = b
        .iter()
        .enumerate()
        .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse every `date_posted` cell; the first bad cell aborts.
pub fn parse_date_column(
    values: &[String],
    column: &'static str,
) -> Result<Vec<NaiveDate>, PrepareError> {
    values
        .iter()
        .enumerate()
        .map(|(row, raw)| {
            parse_ymd(&clean_str(raw)).ok_or_else(|| PrepareError::BadDate {
                column,
                row,
                value: raw.clone(),
            })
        })
        .collect()
}

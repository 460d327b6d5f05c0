use crate::process::error::PrepareError;

/// Cell spellings read as "no value", on top of the empty string.
const NA_TOKENS: [&str; 10] = [
    "na", "n/a", "nan", "-nan", "null", "none", "#n/a", "<na>", "-1.#ind", "1.#qnan",
];

/// 1) Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// 2) Cleaned cell, or `None` when it is empty or an NA marker.
pub fn optional_cell(raw: &str) -> Option<String> {
    let cleaned = clean_str(raw);
    let lower = cleaned.to_ascii_lowercase();
    if cleaned.is_empty() || NA_TOKENS.contains(&lower.as_str()) {
        None
    } else {
        Some(cleaned)
    }
}

/// 3) Parse a numeric cell. Absent cells are `Ok(None)`; anything that is
///    present but not a finite number fails for `column`.
pub fn parse_numeric_cell(
    raw: &str,
    column: &'static str,
    row: usize,
) -> Result<Option<f64>, PrepareError> {
    let Some(cell) = optional_cell(raw) else {
        return Ok(None);
    };
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(PrepareError::NotNumeric {
            column,
            row,
            value: cell,
        }),
    }
}

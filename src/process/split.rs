use tracing::debug;

use crate::schema::VehicleTable;

/// Split `"ford f150"` into `("ford", "f150")` on the first whitespace.
/// Text without whitespace is all make: `"civic"` → `("civic", "")`.
/// Runs of whitespace after the make are not kept in the model.
pub fn split_make_model(combined: &str) -> (String, String) {
    let trimmed = combined.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((make, model)) => (make.to_string(), model.trim_start().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

/// Derive the `make` column from the combined `model` column.
///
/// Returns false without touching the table when `make` already exists.
pub fn apply_make_split(table: &mut VehicleTable) -> bool {
    if table.make.is_some() {
        debug!("make column present, model already split");
        return false;
    }

    let mut makes = Vec::with_capacity(table.model.len());
    for model in table.model.iter_mut() {
        let (make, rest) = split_make_model(model);
        makes.push(make);
        *model = rest;
    }
    table.make = Some(makes);
    true
}

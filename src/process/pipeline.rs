use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PrepareConfig;
use crate::process::{
    date_parser::parse_date_column,
    error::PrepareError,
    impute::{fill_by_group, numeric_key, FillOutcome},
    split::apply_make_split,
};
use crate::schema::{ColumnKind, DateColumn, NumericColumn, VehicleTable};

/// Summary of one preparer run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrepareReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub make_split: bool,
    pub model_year: FillOutcome,
    pub cylinders: FillOutcome,
    pub odometer: FillOutcome,
    pub is_4wd_defaulted: usize,
    pub paint_color_defaulted: usize,
    pub model_year_kind: ColumnKind,
    pub cylinders_kind: ColumnKind,
    pub zero_year_dropped: usize,
}

/// Clean `table` in place:
///
/// 1. split make out of `model`
/// 2. `model_year` ← median per model, then integer if lossless
/// 3. `cylinders`  ← median per model, then integer if lossless
/// 4. `odometer`   ← median per model year (stays float)
/// 5. `is_4wd`     ← 0 when absent, integer
/// 6. `paint_color`← "unknown" when absent
/// 7. `date_posted` parsed as YYYY-MM-DD
/// 8. optionally drop rows with model year 0
///
/// Errors leave the table untouched. Running it again on its own output
/// changes nothing.
#[tracing::instrument(level = "info", skip_all, fields(rows = table.len()))]
pub fn prepare(
    table: &mut VehicleTable,
    config: &PrepareConfig,
) -> Result<PrepareReport, PrepareError> {
    // validate before mutating so a bad table is left as it was
    let dates = match &table.date_posted {
        DateColumn::Text(raw) => Some(parse_date_column(raw, "date_posted")?),
        DateColumn::Parsed(_) => None,
    };
    let is_4wd = default_flag(&table.is_4wd)?;

    let rows_in = table.len();
    let fallback = config.missing_group_fallback.value();

    // 1)
    let make_split = apply_make_split(table);

    // 2) + 3) grouped by model; an empty model belongs to no group
    let model_keys: Vec<Option<String>> = table
        .model
        .iter()
        .map(|m| (!m.is_empty()).then(|| m.clone()))
        .collect();

    let mut years = table.model_year.to_f64();
    let model_year = fill_by_group(&model_keys, &mut years, fallback);
    table.model_year = NumericColumn::resolve(years);

    let mut cylinders = table.cylinders.to_f64();
    let cylinders_fill = fill_by_group(&model_keys, &mut cylinders, fallback);
    table.cylinders = NumericColumn::resolve(cylinders);

    // 4) grouped by model year, never coerced
    let year_keys: Vec<Option<u64>> = (0..table.len())
        .map(|row| table.model_year.get(row).map(numeric_key))
        .collect();
    let mut odometer = table.odometer.to_f64();
    let odometer_fill = fill_by_group(&year_keys, &mut odometer, fallback);
    table.odometer = NumericColumn::Float(odometer);
    if odometer_fill.residual > 0 {
        for row in (0..table.len()).filter(|r| table.odometer.get(*r).is_none()) {
            warn!(
                row,
                model = %table.model[row],
                model_year = ?table.model_year.get(row),
                "odometer still missing after imputation"
            );
        }
    }

    // 5)
    let is_4wd_defaulted = table.is_4wd.missing();
    table.is_4wd = is_4wd;

    // 6)
    let mut paint_color_defaulted = 0;
    for color in table.paint_color.iter_mut().filter(|c| c.is_none()) {
        *color = Some("unknown".to_string());
        paint_color_defaulted += 1;
    }

    // 7)
    if let Some(dates) = dates {
        table.date_posted = DateColumn::Parsed(dates);
    }

    // 8)
    let zero_year_dropped = if config.drop_zero_model_year {
        drop_zero_model_year(table)
    } else {
        0
    };

    let report = PrepareReport {
        rows_in,
        rows_out: table.len(),
        make_split,
        model_year,
        cylinders: cylinders_fill,
        odometer: odometer_fill,
        is_4wd_defaulted,
        paint_color_defaulted,
        model_year_kind: table.model_year.kind(),
        cylinders_kind: table.cylinders.kind(),
        zero_year_dropped,
    };
    debug!(?report, "prepare report");
    info!(
        rows_out = report.rows_out,
        model_year_filled = report.model_year.filled,
        cylinders_filled = report.cylinders.filled,
        odometer_filled = report.odometer.filled,
        "prepared listings"
    );
    Ok(report)
}

/// Remove listings whose model year is 0 and return how many went.
///
/// Exposed so callers can take aggregates over the imputed table before the
/// zero-year rows disappear.
pub fn drop_zero_model_year(table: &mut VehicleTable) -> usize {
    let keep: Vec<bool> = (0..table.len())
        .map(|row| table.model_year.get(row) != Some(0.0))
        .collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        table.retain_rows(&keep);
    }
    dropped
}

/// `is_4wd` with absent values as 0, stored as integers. Only 0 and 1 are
/// accepted.
fn default_flag(column: &NumericColumn) -> Result<NumericColumn, PrepareError> {
    let values = column
        .to_f64()
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v.unwrap_or(0.0) {
            x if x == 0.0 || x == 1.0 => Ok(Some(x)),
            x => Err(PrepareError::OutOfRange {
                column: "is_4wd",
                row,
                value: x.to_string(),
                expected: "0 or 1",
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NumericColumn::resolve(values))
}

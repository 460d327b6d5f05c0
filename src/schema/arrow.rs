// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use std::sync::Arc;

use super::types::{ColumnKind, VehicleTable};

/// Map a resolved column kind into an Arrow DataType.
///
/// - Integer → Int64
/// - Float   → Float64
pub fn map_to_arrow_type(kind: ColumnKind) -> DataType {
    match kind {
        ColumnKind::Integer => DataType::Int64,
        ColumnKind::Float => DataType::Float64,
    }
}

/// Build the ArrowSchema (inside an Arc) for a cleaned table.
///
/// `model_year`, `cylinders`, `odometer` and `is_4wd` follow the table's
/// resolved kinds; `price` and `date_posted` are the only non-nullable fields.
pub fn build_arrow_schema(table: &VehicleTable) -> Arc<ArrowSchema> {
    let fields = vec![
        ArrowField::new("price", DataType::Float64, false),
        ArrowField::new("model_year", map_to_arrow_type(table.model_year.kind()), true),
        ArrowField::new("make", DataType::Utf8, true),
        ArrowField::new("model", DataType::Utf8, true),
        ArrowField::new("condition", DataType::Utf8, true),
        ArrowField::new("cylinders", map_to_arrow_type(table.cylinders.kind()), true),
        ArrowField::new("fuel", DataType::Utf8, true),
        ArrowField::new("odometer", map_to_arrow_type(table.odometer.kind()), true),
        ArrowField::new("transmission", DataType::Utf8, true),
        ArrowField::new("type", DataType::Utf8, true),
        ArrowField::new("paint_color", DataType::Utf8, true),
        ArrowField::new("is_4wd", map_to_arrow_type(table.is_4wd.kind()), true),
        ArrowField::new("date_posted", DataType::Date32, false),
        ArrowField::new("days_listed", DataType::Float64, true),
    ];

    Arc::new(ArrowSchema::new(fields))
}

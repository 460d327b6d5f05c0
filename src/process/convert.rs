use crate::process::error::PrepareError;
use crate::schema::{build_arrow_schema, NumericColumn, VehicleTable};
use anyhow::Result;
use arrow::{
    array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray},
    record_batch::RecordBatch,
};
use chrono::Datelike;
use std::sync::Arc;

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a cleaned table into an Arrow batch for the presentation layer.
///
/// Fails while `date_posted` is still text.
pub fn to_record_batch(table: &VehicleTable) -> Result<RecordBatch> {
    let dates = table
        .date_posted
        .parsed()
        .ok_or(PrepareError::DatesNotParsed("date_posted"))?;

    let make: StringArray = match &table.make {
        Some(makes) => makes.iter().map(Some).collect(),
        None => (0..table.len()).map(|_| None::<&str>).collect(),
    };

    let out: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(table.price.clone())) as ArrayRef,
        numeric_array(&table.model_year),
        Arc::new(make) as ArrayRef,
        Arc::new(table.model.iter().map(Some).collect::<StringArray>()) as ArrayRef,
        string_array(&table.condition),
        numeric_array(&table.cylinders),
        string_array(&table.fuel),
        numeric_array(&table.odometer),
        string_array(&table.transmission),
        string_array(&table.vehicle_type),
        string_array(&table.paint_color),
        numeric_array(&table.is_4wd),
        Arc::new(Date32Array::from_iter_values(
            dates
                .iter()
                .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE),
        )) as ArrayRef,
        Arc::new(Float64Array::from(table.days_listed.clone())) as ArrayRef,
    ];

    RecordBatch::try_new(build_arrow_schema(table), out).map_err(Into::into)
}

fn numeric_array(col: &NumericColumn) -> ArrayRef {
    match col {
        NumericColumn::Float(v) => Arc::new(Float64Array::from(v.clone())),
        NumericColumn::Integer(v) => Arc::new(Int64Array::from(v.clone())),
    }
}

fn string_array(col: &[Option<String>]) -> ArrayRef {
    let arr: StringArray = col.iter().map(|s| s.as_deref()).collect();
    Arc::new(arr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrepareConfig;
    use crate::process::{load_vehicles_from_reader, prepare};
    use arrow::array::Array;
    use arrow::datatypes::DataType;

    const CSV: &str = "\
price,model_year,model,condition,cylinders,fuel,odometer,transmission,type,paint_color,is_4wd,date_posted,days_listed
5000,2015,nissan altima,good,4,gas,100000,automatic,sedan,,,1970-01-02,10
6000,,nissan altima,good,4,gas,,automatic,sedan,red,1,2019-03-15,
";

    #[test]
    fn batch_follows_resolved_kinds() -> Result<()> {
        let mut table = load_vehicles_from_reader(CSV.as_bytes())?;
        prepare(&mut table, &PrepareConfig::default())?;
        let batch = to_record_batch(&table)?;

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 14);
        let schema = batch.schema();
        assert_eq!(schema.field_with_name("model_year")?.data_type(), &DataType::Int64);
        assert_eq!(schema.field_with_name("odometer")?.data_type(), &DataType::Float64);
        assert_eq!(schema.field_with_name("is_4wd")?.data_type(), &DataType::Int64);

        let dates = batch
            .column_by_name("date_posted")
            .and_then(|c| c.as_any().downcast_ref::<Date32Array>())
            .expect("date32 column");
        assert_eq!(dates.value(0), 1);

        let make = batch
            .column_by_name("make")
            .and_then(|c| c.as_any().downcast_ref::<StringArray>())
            .expect("make column");
        assert_eq!(make.value(1), "nissan");

        let days = batch.column_by_name("days_listed").expect("days_listed");
        assert!(days.is_null(1));
        Ok(())
    }

    #[test]
    fn unparsed_dates_are_rejected() -> Result<()> {
        let table = load_vehicles_from_reader(CSV.as_bytes())?;
        let err = to_record_batch(&table).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PrepareError>(),
            Some(&PrepareError::DatesNotParsed("date_posted"))
        );
        Ok(())
    }
}

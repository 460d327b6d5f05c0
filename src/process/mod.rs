// src/process/mod.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};

use std::{collections::HashMap, fs::File, io::BufReader, io::Read, path::Path};
use tracing::{debug, info};

pub mod convert;
pub mod date_parser;
pub mod error;
pub mod impute;
pub mod pipeline;
pub mod split;
pub mod utils;

pub use convert::to_record_batch;
pub use error::PrepareError;
pub use pipeline::{drop_zero_model_year, prepare, PrepareReport};

use crate::schema::{DateColumn, NumericColumn, VehicleTable, VEHICLE_COLUMNS};
use utils::{clean_str, optional_cell, parse_numeric_cell};

/// Position of each expected header in the file.
struct HeaderIndex(HashMap<&'static str, usize>);

impl HeaderIndex {
    fn from_record(headers: &StringRecord) -> Result<Self, PrepareError> {
        let found: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (clean_str(h), i))
            .collect();
        let mut index = HashMap::with_capacity(VEHICLE_COLUMNS.len());
        for name in VEHICLE_COLUMNS {
            let pos = found.get(name).ok_or(PrepareError::MissingColumn(name))?;
            index.insert(name, *pos);
        }
        Ok(Self(index))
    }

    fn cell<'r>(&self, record: &'r StringRecord, column: &'static str) -> &'r str {
        self.0
            .get(column)
            .and_then(|i| record.get(*i))
            .unwrap_or("")
    }
}

/// Open `path` and load every listing into a typed table.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_vehicles_csv<P: AsRef<Path>>(path: P) -> Result<VehicleTable> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open listings file: {:?}", path.as_ref()))?;
    let table = load_vehicles_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load listings from {:?}", path.as_ref()))?;
    info!(rows = table.len(), "loaded listings");
    Ok(table)
}

/// Read a headed listings CSV. Numeric columns are cast here, so a cell
/// that is not a number aborts the whole load; `date_posted` stays text
/// until the preparer parses it.
pub fn load_vehicles_from_reader<R: Read>(reader: R) -> Result<VehicleTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().context("reading CSV header row")?.clone();
    let index = HeaderIndex::from_record(&headers)?;

    let mut price = Vec::new();
    let mut model_year = Vec::new();
    let mut model = Vec::new();
    let mut condition = Vec::new();
    let mut cylinders = Vec::new();
    let mut fuel = Vec::new();
    let mut odometer = Vec::new();
    let mut transmission = Vec::new();
    let mut vehicle_type = Vec::new();
    let mut paint_color = Vec::new();
    let mut is_4wd = Vec::new();
    let mut date_posted = Vec::new();
    let mut days_listed = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", row))?;
        let num = |column: &'static str| parse_numeric_cell(index.cell(&record, column), column, row);
        let text = |column: &'static str| optional_cell(index.cell(&record, column));

        let p = num("price")?.ok_or(PrepareError::MissingValue {
            column: "price",
            row,
        })?;
        if p < 0.0 {
            return Err(PrepareError::OutOfRange {
                column: "price",
                row,
                value: p.to_string(),
                expected: "non-negative",
            }
            .into());
        }
        price.push(p);
        model_year.push(num("model_year")?);
        model.push(text("model").unwrap_or_default());
        condition.push(text("condition"));
        cylinders.push(num("cylinders")?);
        fuel.push(text("fuel"));
        odometer.push(num("odometer")?);
        transmission.push(text("transmission"));
        vehicle_type.push(text("type"));
        paint_color.push(text("paint_color"));
        is_4wd.push(num("is_4wd")?);
        date_posted.push(clean_str(index.cell(&record, "date_posted")));
        days_listed.push(num("days_listed")?);
    }
    debug!(rows = price.len(), "read listing records");

    Ok(VehicleTable {
        price,
        model_year: NumericColumn::Float(model_year),
        make: None,
        model,
        condition,
        cylinders: NumericColumn::Float(cylinders),
        fuel,
        odometer: NumericColumn::Float(odometer),
        transmission,
        vehicle_type,
        paint_color,
        is_4wd: NumericColumn::Float(is_4wd),
        date_posted: DateColumn::Text(date_posted),
        days_listed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
price,model_year,model,condition,cylinders,fuel,odometer,transmission,type,paint_color,is_4wd,date_posted,days_listed
9400,2011.0,bmw x5,good,6.0,gas,145000.0,automatic,SUV,,1.0,2018-06-23,19
25500,,ford f-150,good,6.0,gas,88705.0,automatic,pickup,white,1.0,2018-10-19,50
5500,2013.0,hyundai sonata,like new,4.0,gas,110000.0,automatic,sedan,red,,2019-02-07,79
";

    #[test]
    fn loads_listings_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(CSV.as_bytes())?;

        let table = load_vehicles_csv(tmp.path())?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.price, vec![9400.0, 25500.0, 5500.0]);
        assert_eq!(table.model_year.get(1), None);
        assert_eq!(table.model[0], "bmw x5");
        assert!(table.make.is_none());
        assert_eq!(table.paint_color[0], None);
        assert_eq!(table.condition[2].as_deref(), Some("like new"));
        assert_eq!(table.is_4wd.get(2), None);
        assert_eq!(
            table.date_posted,
            DateColumn::Text(vec![
                "2018-06-23".to_string(),
                "2018-10-19".to_string(),
                "2019-02-07".to_string()
            ])
        );
        Ok(())
    }

    #[test]
    fn header_order_does_not_matter() -> Result<()> {
        let csv = "\
model,price,model_year,condition,cylinders,fuel,odometer,transmission,type,paint_color,is_4wd,date_posted,days_listed
ford f150,100,2010,good,8,gas,1,manual,truck,red,1,2019-01-01,3
";
        let table = load_vehicles_from_reader(csv.as_bytes())?;
        assert_eq!(table.model[0], "ford f150");
        assert_eq!(table.price[0], 100.0);
        Ok(())
    }

    #[test]
    fn non_numeric_cell_names_column() {
        let csv = CSV.replace("145000.0", "lots");
        let err = load_vehicles_from_reader(csv.as_bytes()).unwrap_err();
        let prep = err.downcast_ref::<PrepareError>().expect("typed error");
        assert_eq!(
            prep,
            &PrepareError::NotNumeric {
                column: "odometer",
                row: 0,
                value: "lots".to_string()
            }
        );
    }

    #[test]
    fn missing_header_is_fatal() {
        let csv = CSV.replace(",days_listed", "");
        let err = load_vehicles_from_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PrepareError>(),
            Some(&PrepareError::MissingColumn("days_listed"))
        );
    }

    #[test]
    fn negative_price_is_fatal() {
        let csv = CSV.replace("9400,", "-1,");
        let err = load_vehicles_from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn missing_file_has_context() {
        let err = load_vehicles_csv("/nonexistent/vehicles_us.csv").unwrap_err();
        assert!(err.to_string().contains("Failed to open listings file"));
    }
}

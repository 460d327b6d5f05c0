// src/schema/types.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Header names of the listings file, in file order.
pub const VEHICLE_COLUMNS: [&str; 13] = [
    "price",
    "model_year",
    "model",
    "condition",
    "cylinders",
    "fuel",
    "odometer",
    "transmission",
    "type",
    "paint_color",
    "is_4wd",
    "date_posted",
    "days_listed",
];

/// Storage decision for a numeric column, resolved once after imputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
}

/// A nullable numeric column stored according to its [`ColumnKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum NumericColumn {
    Float(Vec<Option<f64>>),
    Integer(Vec<Option<i64>>),
}

impl NumericColumn {
    /// Pick the integer representation when every present value is whole
    /// and fits in an i64, otherwise keep floats. Absent values stay absent
    /// either way.
    pub fn resolve(values: Vec<Option<f64>>) -> Self {
        // 2^63 itself is not representable as i64
        const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
        let lossless = values
            .iter()
            .flatten()
            .all(|v| v.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(v));
        if lossless {
            NumericColumn::Integer(values.into_iter().map(|v| v.map(|x| x as i64)).collect())
        } else {
            NumericColumn::Float(values)
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            NumericColumn::Float(_) => ColumnKind::Float,
            NumericColumn::Integer(_) => ColumnKind::Integer,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NumericColumn::Float(v) => v.len(),
            NumericColumn::Integer(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row` widened to f64.
    pub fn get(&self, row: usize) -> Option<f64> {
        match self {
            NumericColumn::Float(v) => v.get(row).copied().flatten(),
            NumericColumn::Integer(v) => v.get(row).copied().flatten().map(|x| x as f64),
        }
    }

    pub fn to_f64(&self) -> Vec<Option<f64>> {
        match self {
            NumericColumn::Float(v) => v.clone(),
            NumericColumn::Integer(v) => v.iter().map(|x| x.map(|i| i as f64)).collect(),
        }
    }

    /// Number of absent values.
    pub fn missing(&self) -> usize {
        match self {
            NumericColumn::Float(v) => v.iter().filter(|x| x.is_none()).count(),
            NumericColumn::Integer(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    fn retain(&mut self, keep: &[bool]) {
        match self {
            NumericColumn::Float(v) => retain_by_mask(v, keep),
            NumericColumn::Integer(v) => retain_by_mask(v, keep),
        }
    }
}

/// `date_posted` before and after step 7 of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum DateColumn {
    Text(Vec<String>),
    Parsed(Vec<NaiveDate>),
}

impl DateColumn {
    pub fn len(&self) -> usize {
        match self {
            DateColumn::Text(v) => v.len(),
            DateColumn::Parsed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn parsed(&self) -> Option<&[NaiveDate]> {
        match self {
            DateColumn::Parsed(v) => Some(v),
            DateColumn::Text(_) => None,
        }
    }

    fn retain(&mut self, keep: &[bool]) {
        match self {
            DateColumn::Text(v) => retain_by_mask(v, keep),
            DateColumn::Parsed(v) => retain_by_mask(v, keep),
        }
    }
}

/// Column-oriented listings table. Every column has one entry per row.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleTable {
    pub price: Vec<f64>,
    pub model_year: NumericColumn,
    /// `None` until the combined model field has been split.
    pub make: Option<Vec<String>>,
    /// Empty string when the listing has no model text.
    pub model: Vec<String>,
    pub condition: Vec<Option<String>>,
    pub cylinders: NumericColumn,
    pub fuel: Vec<Option<String>>,
    pub odometer: NumericColumn,
    pub transmission: Vec<Option<String>>,
    pub vehicle_type: Vec<Option<String>>,
    pub paint_color: Vec<Option<String>>,
    pub is_4wd: NumericColumn,
    pub date_posted: DateColumn,
    pub days_listed: Vec<Option<f64>>,
}

impl VehicleTable {
    pub fn len(&self) -> usize {
        self.price.len()
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }

    /// Make of `row`, or `None` while the model field is still combined.
    pub fn make_at(&self, row: usize) -> Option<&str> {
        self.make.as_ref().and_then(|m| m.get(row)).map(String::as_str)
    }

    /// Keep only rows whose entry in `keep` is true.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.len());
        retain_by_mask(&mut self.price, keep);
        self.model_year.retain(keep);
        if let Some(make) = self.make.as_mut() {
            retain_by_mask(make, keep);
        }
        retain_by_mask(&mut self.model, keep);
        retain_by_mask(&mut self.condition, keep);
        self.cylinders.retain(keep);
        retain_by_mask(&mut self.fuel, keep);
        self.odometer.retain(keep);
        retain_by_mask(&mut self.transmission, keep);
        retain_by_mask(&mut self.vehicle_type, keep);
        retain_by_mask(&mut self.paint_color, keep);
        self.is_4wd.retain(keep);
        self.date_posted.retain(keep);
        retain_by_mask(&mut self.days_listed, keep);
    }
}

fn retain_by_mask<T>(values: &mut Vec<T>, keep: &[bool]) {
    let mut flags = keep.iter();
    values.retain(|_| flags.next().copied().unwrap_or(false));
}

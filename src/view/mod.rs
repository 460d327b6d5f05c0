//! Read-only views over the cleaned table for the presentation layer.
//!
//! Nothing here mutates a [`VehicleTable`]; views hold row indices into the
//! canonical table.

use serde::{Deserialize, Serialize};

use crate::schema::VehicleTable;

pub mod summary;

pub use summary::{distinct_models, mean_price_by_model, top_models, ModelPrice};

/// Bounds for the display-only scatter of model year against price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewBounds {
    /// Inclusive lower bound on model year.
    pub min_model_year: f64,
    /// Inclusive upper bound on price.
    pub max_price: f64,
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            min_model_year: 1980.0,
            max_price: 100_000.0,
        }
    }
}

/// Listings inside [`ViewBounds`]. Rows with no model year are left out.
#[derive(Debug, Clone)]
pub struct BoundedView<'a> {
    table: &'a VehicleTable,
    bounds: ViewBounds,
    rows: Vec<usize>,
}

impl<'a> BoundedView<'a> {
    pub fn new(table: &'a VehicleTable, bounds: ViewBounds) -> Self {
        let rows = (0..table.len())
            .filter(|&row| {
                table
                    .model_year
                    .get(row)
                    .is_some_and(|year| year >= bounds.min_model_year)
                    && table.price[row] <= bounds.max_price
            })
            .collect();
        Self {
            table,
            bounds,
            rows,
        }
    }

    pub fn bounds(&self) -> ViewBounds {
        self.bounds
    }

    /// Indices into the canonical table.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(model_year, price, model)` for every row in the view.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, &'a str)> + '_ {
        let table = self.table;
        self.rows.iter().filter_map(move |&row| {
            let year = table.model_year.get(row)?;
            Some((year, table.price[row], table.model[row].as_str()))
        })
    }

    /// Upper end of the year axis: the newest model year in the view.
    pub fn max_model_year(&self) -> Option<f64> {
        self.points().map(|(year, _, _)| year).reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrepareConfig;
    use crate::process::{load_vehicles_from_reader, prepare};
    use anyhow::Result;

    const CSV: &str = "\
price,model_year,model,condition,cylinders,fuel,odometer,transmission,type,paint_color,is_4wd,date_posted,days_listed
3500,1975,chevrolet corvette,fair,8,gas,90000,manual,coupe,red,0,2019-01-01,10
12000,2012,ford f-150,good,6,gas,100000,automatic,pickup,white,1,2019-01-01,10
150000,2018,ferrari 488,excellent,8,gas,2000,automatic,coupe,red,0,2019-01-01,10
9000,,gmc sierra,good,8,gas,120000,automatic,pickup,black,1,2019-01-01,10
100000,2016,ford mustang,excellent,8,gas,15000,manual,coupe,blue,0,2019-01-01,10
";

    #[test]
    fn bounded_view_is_non_destructive() -> Result<()> {
        let mut table = load_vehicles_from_reader(CSV.as_bytes())?;
        prepare(&mut table, &PrepareConfig::default())?;
        let before = table.clone();

        let view = BoundedView::new(&table, ViewBounds::default());
        // 1975 corvette below the year bound, ferrari above the price bound,
        // sierra has no year; the 100000 mustang sits on the bound
        assert_eq!(view.rows(), &[1, 4]);
        assert_eq!(view.max_model_year(), Some(2016.0));
        assert_eq!(view.points().next(), Some((2012.0, 12000.0, "f-150")));

        assert_eq!(table, before);
        assert_eq!(table.model_year.get(0), Some(1975.0));
        Ok(())
    }

    #[test]
    fn empty_view() -> Result<()> {
        let mut table = load_vehicles_from_reader(CSV.as_bytes())?;
        prepare(&mut table, &PrepareConfig::default())?;
        let view = BoundedView::new(
            &table,
            ViewBounds {
                min_model_year: 2030.0,
                max_price: 100_000.0,
            },
        );
        assert!(view.is_empty());
        assert_eq!(view.max_model_year(), None);
        Ok(())
    }
}

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::schema::VehicleTable;

/// Mean listing price of one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPrice {
    pub model: String,
    pub mean_price: f64,
    pub listings: usize,
}

/// Mean price per model, most expensive first; ties by model name.
/// Listings with an empty model are not a model and are skipped.
pub fn mean_price_by_model(table: &VehicleTable) -> Vec<ModelPrice> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for (model, price) in table
        .model
        .iter()
        .zip(&table.price)
        .filter(|(m, _)| !m.is_empty())
    {
        let entry = sums.entry(model.as_str()).or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    let mut out: Vec<ModelPrice> = sums
        .into_iter()
        .map(|(model, (sum, n))| ModelPrice {
            model: model.to_string(),
            mean_price: sum / n as f64,
            listings: n,
        })
        .collect();
    out.sort_by(|a, b| {
        b.mean_price
            .total_cmp(&a.mean_price)
            .then_with(|| a.model.cmp(&b.model))
    });
    out
}

/// The `n` most expensive models by mean price.
pub fn top_models(table: &VehicleTable, n: usize) -> Vec<ModelPrice> {
    let mut ranked = mean_price_by_model(table);
    ranked.truncate(n);
    ranked
}

/// Sorted, de-duplicated model names for the model selector, without the
/// empty model.
pub fn distinct_models(table: &VehicleTable) -> Vec<&str> {
    table
        .model
        .iter()
        .map(String::as_str)
        .filter(|m| !m.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

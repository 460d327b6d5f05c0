use std::{collections::HashMap, hash::Hash};

use serde::Serialize;

/// What a grouped fill did to one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FillOutcome {
    /// Absent values replaced by a group median.
    pub filled: usize,
    /// Absent values replaced by the fallback, when one is configured.
    pub fallback: usize,
    /// Values still absent afterwards.
    pub residual: usize,
}

/// Median of `values`; the mean of the two middle values for even counts.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Median of the present values of every key. Rows without a key, and keys
/// with no present value, contribute nothing.
pub fn group_medians<K: Eq + Hash + Clone>(
    keys: &[Option<K>],
    values: &[Option<f64>],
) -> HashMap<K, f64> {
    let mut groups: HashMap<K, Vec<f64>> = HashMap::new();
    for (key, value) in keys.iter().zip(values) {
        if let (Some(k), Some(v)) = (key, value) {
            groups.entry(k.clone()).or_default().push(*v);
        }
    }
    groups
        .into_iter()
        .filter_map(|(k, mut vs)| median(&mut vs).map(|m| (k, m)))
        .collect()
}

/// Fill absent `values` with their group's median, then with `fallback`.
pub fn fill_by_group<K: Eq + Hash + Clone>(
    keys: &[Option<K>],
    values: &mut [Option<f64>],
    fallback: Option<f64>,
) -> FillOutcome {
    let medians = group_medians(keys, values);
    let mut outcome = FillOutcome::default();

    for (key, value) in keys.iter().zip(values.iter_mut()) {
        if value.is_some() {
            continue;
        }
        if let Some(m) = key.as_ref().and_then(|k| medians.get(k)) {
            *value = Some(*m);
            outcome.filled += 1;
        } else if let Some(f) = fallback {
            *value = Some(f);
            outcome.fallback += 1;
        } else {
            outcome.residual += 1;
        }
    }
    outcome
}

/// Hashable key for a numeric group value such as a model year.
pub fn numeric_key(v: f64) -> u64 {
    // +0.0 folds -0.0 into the same bucket
    (v + 0.0).to_bits()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [2015.0, 2017.0]), Some(2016.0));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn fills_from_own_group_only() {
        let keys = vec![
            Some("altima"),
            Some("altima"),
            Some("altima"),
            Some("f150"),
            Some("f150"),
        ];
        let mut values = vec![Some(2015.0), None, Some(2017.0), Some(2009.0), None];
        let out = fill_by_group(&keys, &mut values, None);

        assert_eq!(values[1], Some(2016.0));
        assert_eq!(values[4], Some(2009.0));
        assert_eq!(out.filled, 2);
        assert_eq!(out.residual, 0);
    }

    #[test]
    fn group_without_values_stays_absent_or_takes_fallback() {
        let keys = vec![Some("sierra"), Some("sierra"), None];
        let mut values = vec![None, None, None];
        let out = fill_by_group(&keys, &mut values, None);
        assert_eq!(values, vec![None, None, None]);
        assert_eq!(out.residual, 3);

        let out = fill_by_group(&keys, &mut values, Some(0.0));
        assert_eq!(values, vec![Some(0.0); 3]);
        assert_eq!(out.fallback, 3);
        assert_eq!(out.residual, 0);
    }

    #[test]
    fn numeric_key_folds_signed_zero() {
        assert_eq!(numeric_key(0.0), numeric_key(-0.0));
        assert_ne!(numeric_key(2011.0), numeric_key(2012.0));
    }
}

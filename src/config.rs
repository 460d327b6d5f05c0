// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::view::ViewBounds;

/// What a listing gets when its whole imputation group has no known value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingGroupFallback {
    /// Leave the value absent; consumers must tolerate it.
    #[default]
    Absent,
    /// Use 0, the historical "unknown" sentinel.
    Zero,
}

impl MissingGroupFallback {
    pub fn value(self) -> Option<f64> {
        match self {
            MissingGroupFallback::Absent => None,
            MissingGroupFallback::Zero => Some(0.0),
        }
    }
}

/// Knobs for the preparer and the presentation views.
///
/// ```yaml
/// drop_zero_model_year: true
/// missing_group_fallback: absent
/// view:
///   min_model_year: 1980
///   max_price: 100000
/// top_models: 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Drop listings whose model year is 0 after imputation.
    pub drop_zero_model_year: bool,
    pub missing_group_fallback: MissingGroupFallback,
    pub view: ViewBounds,
    /// How many models the mean-price ranking keeps.
    pub top_models: usize,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            drop_zero_model_year: true,
            missing_group_fallback: MissingGroupFallback::Absent,
            view: ViewBounds::default(),
            top_models: 10,
        }
    }
}

impl PrepareConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing preparer config YAML")
    }

    /// Load a YAML config file; missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {:?}", path.as_ref()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {:?}", path.as_ref()))
    }
}

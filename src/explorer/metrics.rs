//! Scalar summaries of a field
//!
//! Every exploration run is reduced to the same five numbers so that sweeps
//! can be compared point by point.

use std::fmt;

use crate::physics::Grid;

/// Names of the metrics, in the order of [`FieldMetrics::values`]
pub const METRIC_NAMES: [&str; 5] = [
    "max_value",
    "min_value",
    "total_sum",
    "total_energy",
    "center_value",
];

/// Reduction of one field to its summary metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMetrics {
    /// Largest cell value
    pub max_value: f64,

    /// Smallest cell value
    pub min_value: f64,

    /// Sum of all cells
    pub total_sum: f64,

    /// Sum of squared cells
    pub total_energy: f64,

    /// Value at `(rows/2, cols/2)`
    pub center_value: f64,
}

impl FieldMetrics {
    /// Compute the metrics of `grid`
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            max_value: grid.max(),
            min_value: grid.min(),
            total_sum: grid.sum(),
            total_energy: grid.sum_of_squares(),
            center_value: grid.center_value(),
        }
    }

    /// Look up a metric by name
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "max_value" => Some(self.max_value),
            "min_value" => Some(self.min_value),
            "total_sum" => Some(self.total_sum),
            "total_energy" => Some(self.total_energy),
            "center_value" => Some(self.center_value),
            _ => None,
        }
    }

    /// `(name, value)` pairs in [`METRIC_NAMES`] order
    pub fn values(&self) -> [(&'static str, f64); 5] {
        [
            (METRIC_NAMES[0], self.max_value),
            (METRIC_NAMES[1], self.min_value),
            (METRIC_NAMES[2], self.total_sum),
            (METRIC_NAMES[3], self.total_energy),
            (METRIC_NAMES[4], self.center_value),
        ]
    }
}

impl fmt::Display for FieldMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max={:.4e} min={:.4e} sum={:.4e} energy={:.4e} center={:.4e}",
            self.max_value, self.min_value, self.total_sum, self.total_energy, self.center_value
        )
    }
}

//! Per-feature normalization parameters.

use serde::{Deserialize, Serialize};

/// Per-feature min/max vectors computed once over a training dataset.
///
/// Invariant: `maxs[j] >= mins[j]` for every feature `j`. The degenerate
/// `max == min` case is handled by the normalizer, not rejected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    /// Elementwise minimum per feature.
    pub mins: Vec<f64>,
    /// Elementwise maximum per feature.
    pub maxs: Vec<f64>,
}

impl NormalizationParams {
    /// Create new normalization parameters.
    pub fn new(mins: Vec<f64>, maxs: Vec<f64>) -> Self {
        Self { mins, maxs }
    }

    /// Number of features covered by these parameters.
    pub fn nb_features(&self) -> usize {
        self.mins.len()
    }

    /// Per-feature range `max - min`.
    pub fn ranges(&self) -> Vec<f64> {
        self.mins
            .iter()
            .zip(self.maxs.iter())
            .map(|(lo, hi)| hi - lo)
            .collect()
    }
}

//! Time-series prediction output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A timestamp-aligned prediction over one or more features.
///
/// `timestamps`, and every per-feature series in `observed` and
/// `predicted`, correspond positionally. `None` marks positions lacking
/// sufficient history or data to produce a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimesPrediction {
    /// Bucket timestamps (epoch seconds).
    pub timestamps: Vec<i64>,
    /// Observed values per feature.
    pub observed: BTreeMap<String, Vec<Option<f64>>>,
    /// Predicted values per feature.
    pub predicted: BTreeMap<String, Vec<Option<f64>>>,
}

/// One bucket of a prediction, as produced by [`TimesPrediction::format_buckets`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionBucket {
    pub timestamp: i64,
    pub observed: BTreeMap<String, Option<f64>>,
    pub predicted: BTreeMap<String, Option<f64>>,
}

/// Borrowed series view of a prediction, as produced by
/// [`TimesPrediction::format_series`]: parallel per-feature series keyed by
/// feature name.
#[derive(Debug, Serialize)]
pub struct PredictionSeries<'a> {
    pub timestamps: &'a [i64],
    pub observed: &'a BTreeMap<String, Vec<Option<f64>>>,
    pub predicted: &'a BTreeMap<String, Vec<Option<f64>>>,
}

impl TimesPrediction {
    /// Return prediction data as parallel per-feature series.
    pub fn format_series(&self) -> PredictionSeries<'_> {
        PredictionSeries {
            timestamps: &self.timestamps,
            observed: &self.observed,
            predicted: &self.predicted,
        }
    }

    /// Return prediction data as one bucket record per timestamp.
    pub fn format_buckets(&self) -> Vec<PredictionBucket> {
        self.timestamps
            .iter()
            .enumerate()
            .map(|(i, &ts)| PredictionBucket {
                timestamp: ts,
                observed: self
                    .predicted
                    .keys()
                    .map(|feature| {
                        (
                            feature.clone(),
                            self.observed.get(feature).and_then(|v| v[i]),
                        )
                    })
                    .collect(),
                predicted: self
                    .predicted
                    .iter()
                    .map(|(feature, values)| (feature.clone(), values[i]))
                    .collect(),
            })
            .collect()
    }
}

//! Bucketed data-source rows.

use serde::{Deserialize, Serialize};

/// One aggregated bucket returned by a data source, ordered by time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimesBucket {
    /// Backend-specific bucket key.
    pub key: String,
    /// One aggregated value per feature, in feature order. Missing
    /// aggregations are `NaN`.
    pub values: Vec<f64>,
    /// Bucket start timestamp (epoch seconds).
    pub ts: i64,
}

impl TimesBucket {
    /// Create a new bucket row.
    pub fn new(key: impl Into<String>, values: Vec<f64>, ts: i64) -> Self {
        Self {
            key: key.into(),
            values,
            ts,
        }
    }
}

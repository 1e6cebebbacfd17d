//! In-memory data source for tests and demos.

use std::sync::Mutex;
use timecast_spi::{Result, TimecastError, TimesBucket, TimesDataSource, TimesPrediction};

/// A dense in-memory data source holding one row per bucket.
///
/// Buckets whose every value is missing are omitted from query results,
/// the same way a real backend omits buckets that aggregated nothing.
/// Saved predictions are retained for inspection.
pub struct MemoryDataSource {
    name: String,
    start_ts: i64,
    bucket_interval: i64,
    rows: Vec<Vec<f64>>,
    saved: Mutex<Vec<(String, TimesPrediction)>>,
}

impl MemoryDataSource {
    /// Create a source whose first bucket starts at `start_ts`.
    pub fn new(start_ts: i64, bucket_interval: u64, rows: Vec<Vec<f64>>) -> Self {
        Self {
            name: "memory".to_string(),
            start_ts,
            bucket_interval: bucket_interval as i64,
            rows,
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Number of predictions saved so far.
    pub fn nb_saved_predictions(&self) -> usize {
        self.saved.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Model names of the saved predictions, in save order.
    pub fn saved_model_names(&self) -> Vec<String> {
        self.saved
            .lock()
            .map(|s| s.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }
}

impl TimesDataSource for MemoryDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_times_start(&self, _index: &str) -> Result<i64> {
        if self.rows.is_empty() {
            return Err(TimecastError::DataSource("source is empty".to_string()));
        }
        Ok(self.start_ts)
    }

    fn get_times_end(&self, _index: &str) -> Result<i64> {
        if self.rows.is_empty() {
            return Err(TimecastError::DataSource("source is empty".to_string()));
        }
        Ok(self.start_ts + (self.rows.len() as i64 - 1) * self.bucket_interval)
    }

    fn get_times_data(
        &self,
        features: &[String],
        from_ts: i64,
        to_ts: i64,
    ) -> Result<Vec<TimesBucket>> {
        let mut buckets = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            let ts = self.start_ts + i as i64 * self.bucket_interval;
            if ts < from_ts || ts > to_ts {
                continue;
            }
            if row.iter().all(|v| v.is_nan()) {
                continue;
            }
            let values: Vec<f64> = row.iter().take(features.len()).copied().collect();
            buckets.push(TimesBucket::new(ts.to_string(), values, ts));
        }
        Ok(buckets)
    }

    fn save_timeseries_prediction(
        &self,
        prediction: &TimesPrediction,
        model_name: &str,
    ) -> Result<()> {
        self.saved
            .lock()
            .map_err(|_| TimecastError::DataSource("prediction store poisoned".to_string()))?
            .push((model_name.to_string(), prediction.clone()));
        Ok(())
    }
}

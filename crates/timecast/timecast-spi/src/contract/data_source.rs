//! Data source trait definition.

use crate::error::Result;
use crate::model::{TimesBucket, TimesPrediction};

/// Trait for bucketed time-series data sources.
///
/// Implementations aggregate raw measurements into fixed-width buckets and
/// return them ordered by bucket start. Data extraction is I/O-bound and may
/// block.
pub trait TimesDataSource: Send + Sync {
    /// Data source name.
    fn name(&self) -> &str;

    /// Timestamp of the earliest data available in `index`.
    fn get_times_start(&self, index: &str) -> Result<i64>;

    /// Timestamp of the latest data available in `index`.
    fn get_times_end(&self, index: &str) -> Result<i64>;

    /// Fetch aggregated buckets for `[from_ts, to_ts]`, one value per
    /// feature name, ordered by bucket. Buckets with no data for a feature
    /// carry `NaN` for it; buckets with no data at all may be omitted, the
    /// caller realigns positionally.
    fn get_times_data(
        &self,
        features: &[String],
        from_ts: i64,
        to_ts: i64,
    ) -> Result<Vec<TimesBucket>>;

    /// Persist a prediction back into the source for later comparison.
    fn save_timeseries_prediction(
        &self,
        prediction: &TimesPrediction,
        model_name: &str,
    ) -> Result<()>;
}

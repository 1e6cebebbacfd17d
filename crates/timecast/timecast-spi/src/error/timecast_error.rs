//! Pipeline error types.

use thiserror::Error;

/// Timecast pipeline errors.
///
/// `NoData`, `ModelNotTrained` and `Invalid` are user-facing and
/// non-retryable. `SearchFailed` is raised only when every candidate in the
/// search budget failed; individual candidate failures are absorbed by the
/// search loop.
#[derive(Debug, Error)]
pub enum TimecastError {
    #[error("no data found for time range {from_ts}-{to_ts}")]
    NoData { from_ts: i64, to_ts: i64 },

    #[error("model not trained")]
    ModelNotTrained,

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("hyperparameter search failed: all {attempted} candidates failed")]
    SearchFailed { attempted: usize },

    #[error("regressor error: {0}")]
    Regressor(String),

    #[error("data source error: {0}")]
    DataSource(String),

    #[error("artifact error: {0}")]
    Artifact(String),
}

/// Result type for timecast operations.
pub type Result<T> = std::result::Result<T, TimecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_display() {
        let error = TimecastError::NoData {
            from_ts: 1000,
            to_ts: 2000,
        };
        assert_eq!(error.to_string(), "no data found for time range 1000-2000");
    }

    #[test]
    fn test_model_not_trained_display() {
        let error = TimecastError::ModelNotTrained;
        assert_eq!(error.to_string(), "model not trained");
    }

    #[test]
    fn test_invalid_display() {
        let error = TimecastError::Invalid("unknown requested format".to_string());
        assert_eq!(error.to_string(), "invalid request: unknown requested format");
    }

    #[test]
    fn test_search_failed_display() {
        let error = TimecastError::SearchFailed { attempted: 10 };
        assert_eq!(
            error.to_string(),
            "hyperparameter search failed: all 10 candidates failed"
        );
    }

    #[test]
    fn test_error_is_debug() {
        let error = TimecastError::ModelNotTrained;
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("ModelNotTrained"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(TimecastError::Regressor("diverged".to_string()));
        assert!(!error.to_string().is_empty());
    }

    #[test]
    fn test_all_error_variants_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TimecastError>();
    }
}

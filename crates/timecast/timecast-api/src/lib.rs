//! Timecast Consumer API
//!
//! Configuration types and DTOs for timecast consumers. Settings are
//! validated here, before they reach the pipeline core.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Re-export SPI types
pub use timecast_spi::{Result, TimecastError};

/// One named feature extracted from the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name, unique within a model.
    pub name: String,
    /// Aggregation metric (e.g. `avg`, `count`).
    pub metric: String,
    /// Source field the metric aggregates over.
    pub field: String,
}

impl Feature {
    /// Create a new feature descriptor.
    pub fn new(
        name: impl Into<String>,
        metric: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            metric: metric.into(),
            field: field.into(),
        }
    }
}

/// Settings of one time-series model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model name, also the storage key.
    pub name: String,
    /// Data source index queried for data and bounds.
    pub index: String,
    /// Width of one time bucket, in seconds.
    pub bucket_interval: u64,
    /// Scheduling interval between periodic predictions, in seconds.
    pub interval: u64,
    /// Delay applied to the queried range to let late data arrive, in seconds.
    pub offset: u64,
    /// Number of preceding buckets used as input context.
    pub span: usize,
    /// Ordered feature descriptors.
    pub features: Vec<Feature>,
}

impl ModelSettings {
    /// Validate the settings, returning `Invalid` on the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(TimecastError::Invalid("model name is empty".to_string()));
        }
        if self.bucket_interval == 0 {
            return Err(TimecastError::Invalid(
                "bucket_interval must be positive".to_string(),
            ));
        }
        if self.span == 0 {
            return Err(TimecastError::Invalid("span must be positive".to_string()));
        }
        if self.features.is_empty() {
            return Err(TimecastError::Invalid(
                "at least one feature is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of features.
    pub fn nb_features(&self) -> usize {
        self.features.len()
    }

    /// Feature names, in order.
    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name.clone()).collect()
    }
}

/// Training configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Fraction of the dataset used for training (rest is held out).
    pub train_size: f64,
    /// Mini-batch size.
    pub batch_size: usize,
    /// Maximum training epochs per candidate.
    pub num_epochs: usize,
    /// Hyperparameter search budget.
    pub max_evals: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_size: 0.67,
            batch_size: 64,
            num_epochs: 100,
            max_evals: 10,
        }
    }
}

impl TrainConfig {
    /// Set the train/test split fraction.
    pub fn train_size(mut self, size: f64) -> Self {
        self.train_size = size.clamp(0.1, 0.9);
        self
    }

    /// Set the mini-batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the maximum epochs per candidate.
    pub fn num_epochs(mut self, epochs: usize) -> Self {
        self.num_epochs = epochs.max(1);
        self
    }

    /// Set the search budget.
    pub fn max_evals(mut self, evals: usize) -> Self {
        self.max_evals = evals.max(1);
        self
    }
}

/// Requested prediction output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Parallel per-feature series.
    #[default]
    Series,
    /// One record per bucket.
    Buckets,
}

impl FromStr for OutputFormat {
    type Err = TimecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "series" => Ok(OutputFormat::Series),
            "buckets" => Ok(OutputFormat::Buckets),
            other => Err(TimecastError::Invalid(format!(
                "unknown requested format '{}'",
                other
            ))),
        }
    }
}

/// Comparison type of a forecast constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    /// Violated when a forecasted value drops below the threshold.
    Low,
    /// Violated when a forecasted value rises above the threshold.
    High,
}

/// Post-hoc constraint checked against a forecasted series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    /// Feature the constraint applies to.
    pub feature: String,
    /// Comparison type.
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    /// Threshold value.
    pub threshold: f64,
}

/// One constraint violation found in a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Timestamp of the violating bucket.
    pub timestamp: i64,
    /// Forecasted value that crossed the threshold.
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settings() -> ModelSettings {
        ModelSettings {
            name: "cpu-usage".to_string(),
            index: "metrics".to_string(),
            bucket_interval: 1200,
            interval: 60,
            offset: 30,
            span: 10,
            features: vec![Feature::new("avg_cpu", "avg", "cpu")],
        }
    }

    #[test]
    fn test_settings_validate_ok() {
        assert!(sample_settings().validate().is_ok());
    }

    #[test]
    fn test_settings_zero_span_rejected() {
        let mut settings = sample_settings();
        settings.span = 0;
        assert!(matches!(
            settings.validate(),
            Err(TimecastError::Invalid(_))
        ));
    }

    #[test]
    fn test_settings_no_features_rejected() {
        let mut settings = sample_settings();
        settings.features.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_train_config_default() {
        let config = TrainConfig::default();
        assert_eq!(config.train_size, 0.67);
        assert_eq!(config.batch_size, 64);
        assert_eq!(config.num_epochs, 100);
        assert_eq!(config.max_evals, 10);
    }

    #[test]
    fn test_train_config_setters_clamp() {
        let config = TrainConfig::default().train_size(2.0).max_evals(0);
        assert_eq!(config.train_size, 0.9);
        assert_eq!(config.max_evals, 1);
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("series".parse::<OutputFormat>().unwrap(), OutputFormat::Series);
        assert_eq!("buckets".parse::<OutputFormat>().unwrap(), OutputFormat::Buckets);
    }

    #[test]
    fn test_output_format_unknown_is_invalid() {
        let err = "csv".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, TimecastError::Invalid(_)));
        assert!(err.to_string().contains("csv"));
    }

    #[test]
    fn test_constraint_serde_type_field() {
        let constraint = Constraint {
            feature: "avg_cpu".to_string(),
            constraint_type: ConstraintType::High,
            threshold: 0.9,
        };
        let json = serde_json::to_string(&constraint).unwrap();
        assert!(json.contains("\"type\":\"high\""));
    }
}

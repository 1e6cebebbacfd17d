//! Time-Series Modeling Service Provider Interface
//!
//! Defines the contracts and data models for the timecast pipeline:
//! the trainable sequence regressor, the hyperparameter search driver,
//! the bucketed data source, and the persisted model artifact.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{
    DiscardProgress, FitOptions, ParamDimension, ParameterSpace, ProgressSink, RegressorFactory,
    SearchDriver, SequenceRegressor, TimesDataSource, TrialOutcome, TrialStatus,
};
pub use error::{Result, TimecastError};
pub use model::{
    HyperParamValue, HyperparameterCandidate, ModelArtifact, NormalizationParams, PredictionBucket,
    PredictionSeries, RawParams, RegressorBlob, TimesBucket, TimesPrediction, Window, WindowSet,
};

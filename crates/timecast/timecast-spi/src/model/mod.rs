//! Data models for the timecast pipeline.
//!
//! This module contains data structures shared between the pipeline core and
//! its pluggable capabilities.

mod artifact;
mod bucket;
mod candidate;
mod normalization;
mod prediction;
mod window;

pub use artifact::{ModelArtifact, RegressorBlob};
pub use bucket::TimesBucket;
pub use candidate::{HyperParamValue, HyperparameterCandidate, RawParams};
pub use normalization::NormalizationParams;
pub use prediction::{PredictionBucket, PredictionSeries, TimesPrediction};
pub use window::{Window, WindowSet};

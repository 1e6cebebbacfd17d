//! Contract definitions for the timecast pipeline.
//!
//! This module contains trait definitions that providers must implement.

mod data_source;
mod progress;
mod search_driver;
mod sequence_regressor;

pub use data_source::TimesDataSource;
pub use progress::{DiscardProgress, ProgressSink};
pub use search_driver::{ParamDimension, ParameterSpace, SearchDriver, TrialOutcome, TrialStatus};
pub use sequence_regressor::{FitOptions, RegressorFactory, SequenceRegressor};

//! Timecast Core
//!
//! Implementations behind the timecast SPI: dataset windowing, min-max
//! normalization, the hyperparameter space and search orchestration, the
//! artifact codec, the model train/predict/forecast orchestration, and
//! reference implementations of the sequence regressor and search driver.

mod artifact;
mod dataset;
mod driver;
mod model;
mod normalize;
mod regressor;
mod search;
mod source;
mod space;

pub use artifact::ArtifactCodec;
pub use dataset::{SplitBuilder, WindowDatasetBuilder};
pub use driver::RandomSearchDriver;
pub use model::{TimeSeriesModel, TimesForecast};
pub use normalize::Normalizer;
pub use regressor::{DenseRegressorFactory, DenseSequenceRegressor};
pub use search::{SearchOrchestrator, SearchOutcome};
pub use source::MemoryDataSource;
pub use space::HyperparameterSpace;

//! Timecast Facade
//!
//! Unified re-exports for the timecast modeling pipeline.
//!
//! This facade provides a single entry point to all pipeline functionality:
//! - Capability traits (`TimesDataSource`, `SequenceRegressor`, `SearchDriver`)
//!   and data types from SPI
//! - Configuration types (`ModelSettings`, `TrainConfig`, `Constraint`) from API
//! - `TimeSeriesModel` and the reference implementations from Core

// Re-export everything from SPI
pub use timecast_spi::*;

// Re-export everything from API
pub use timecast_api::*;

// Re-export everything from Core
pub use timecast_core::*;

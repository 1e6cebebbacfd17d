//! Error types for the timecast pipeline.
//!
//! This module contains error types and the Result alias.

mod timecast_error;

pub use timecast_error::{Result, TimecastError};

//! Trainable sequence regressor trait definitions.

use crate::error::Result;
use crate::model::{HyperparameterCandidate, RegressorBlob, Window, WindowSet};
use serde::{Deserialize, Serialize};

/// Training options for a single fit run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitOptions {
    /// Maximum number of training epochs.
    pub num_epochs: usize,
    /// Mini-batch size.
    pub batch_size: usize,
    /// Early-stopping patience, in epochs without validation improvement.
    pub patience: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            num_epochs: 100,
            batch_size: 64,
            patience: 5,
        }
    }
}

/// Trait for trainable sequence regressors.
///
/// A sequence regressor maps a window of feature vectors to the next
/// feature vector. The pipeline is agnostic to the learning machinery
/// underneath; any implementation of this trait plugs in.
pub trait SequenceRegressor: Send + std::fmt::Debug {
    /// Fit on training windows, early-stopping on validation loss.
    fn fit(&mut self, train: &WindowSet, validation: &WindowSet, options: FitOptions)
        -> Result<()>;

    /// Evaluate loss on held-out windows (lower is better).
    fn evaluate(&self, x: &[Window], y: &[Vec<f64>]) -> Result<f64>;

    /// Predict the next row for each input window.
    fn predict(&self, x: &[Window]) -> Result<Vec<Vec<f64>>>;

    /// Serialize internal structure and weights as opaque payloads.
    fn save(&self) -> Result<RegressorBlob>;
}

/// Trait for regressor construction and restoration.
///
/// The search loop builds a fresh regressor for every candidate; the
/// predict path restores one from a persisted blob, recompiled with the
/// stored loss/optimizer identifiers.
pub trait RegressorFactory: Send + Sync {
    /// Build an untrained regressor for the candidate configuration.
    fn build(
        &self,
        candidate: &HyperparameterCandidate,
        nb_features: usize,
    ) -> Result<Box<dyn SequenceRegressor>>;

    /// Restore a trained regressor from its serialized payloads.
    fn restore(
        &self,
        blob: &RegressorBlob,
        loss_fct: &str,
        optimizer: &str,
    ) -> Result<Box<dyn SequenceRegressor>>;
}

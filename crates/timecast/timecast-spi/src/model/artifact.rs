//! Persisted model artifact types.

use crate::model::{HyperparameterCandidate, NormalizationParams};
use serde::{Deserialize, Serialize};

/// Opaque serialized regressor payloads.
///
/// `graph` describes the regressor's internal structure, `weights` its
/// trained parameters. Both are backend-specific byte blobs; the pipeline
/// never inspects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressorBlob {
    pub graph: Vec<u8>,
    pub weights: Vec<u8>,
}

/// The persisted state of a trained model.
///
/// Created once at the end of a successful train and never mutated in
/// place; a new train produces a new artifact that replaces the old one
/// atomically from the storage collaborator's perspective. The regressor
/// payloads are base64 text so the artifact stays text-safe end to end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Base64-encoded regressor structure payload.
    pub graph: String,
    /// Base64-encoded regressor weights payload.
    pub weights: String,
    /// Loss function identifier used to recompile the regressor on load.
    pub loss_fct: String,
    /// Optimizer identifier used to recompile the regressor on load.
    pub optimizer: String,
    /// Hyperparameters selected by the search.
    pub best_params: HyperparameterCandidate,
    /// Per-feature normalization minimums.
    pub mins: Vec<f64>,
    /// Per-feature normalization maximums.
    pub maxs: Vec<f64>,
}

impl ModelArtifact {
    /// Normalization parameters stored in the artifact.
    pub fn normalization(&self) -> NormalizationParams {
        NormalizationParams::new(self.mins.clone(), self.maxs.clone())
    }
}

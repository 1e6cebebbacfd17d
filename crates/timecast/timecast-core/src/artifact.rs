//! Model artifact (de)serialization.

use base64::{engine::general_purpose, Engine};
use timecast_spi::{
    HyperparameterCandidate, ModelArtifact, NormalizationParams, RegressorBlob, RegressorFactory,
    Result, SequenceRegressor, TimecastError,
};

/// Encodes trained state into a text-safe artifact and back.
pub struct ArtifactCodec;

impl ArtifactCodec {
    /// Serialize a trained regressor and its normalization into an
    /// artifact.
    pub fn serialize(
        regressor: &dyn SequenceRegressor,
        normalization: &NormalizationParams,
        candidate: &HyperparameterCandidate,
    ) -> Result<ModelArtifact> {
        let blob = regressor.save()?;
        Ok(ModelArtifact {
            graph: general_purpose::STANDARD.encode(&blob.graph),
            weights: general_purpose::STANDARD.encode(&blob.weights),
            loss_fct: candidate.loss_fct().to_string(),
            optimizer: candidate.optimizer().to_string(),
            best_params: candidate.clone(),
            mins: normalization.mins.clone(),
            maxs: normalization.maxs.clone(),
        })
    }

    /// Reconstruct a ready-to-predict regressor and the stored
    /// normalization parameters from an artifact.
    pub fn deserialize(
        artifact: &ModelArtifact,
        factory: &dyn RegressorFactory,
    ) -> Result<(Box<dyn SequenceRegressor>, NormalizationParams)> {
        let graph = general_purpose::STANDARD
            .decode(&artifact.graph)
            .map_err(|e| TimecastError::Artifact(format!("bad graph encoding: {}", e)))?;
        let weights = general_purpose::STANDARD
            .decode(&artifact.weights)
            .map_err(|e| TimecastError::Artifact(format!("bad weights encoding: {}", e)))?;

        let blob = RegressorBlob { graph, weights };
        let regressor = factory.restore(&blob, &artifact.loss_fct, &artifact.optimizer)?;
        Ok((regressor, artifact.normalization()))
    }
}

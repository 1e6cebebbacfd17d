//! Model settings and artifact persistence.

use std::fs;
use std::path::{Path, PathBuf};
use timecast::{ModelArtifact, ModelSettings};

use crate::WorkerError;

/// Trait for model storage backends.
pub trait ModelStore: Send + Sync {
    /// Load the settings of a known model.
    fn load_settings(&self, name: &str) -> Result<ModelSettings, WorkerError>;

    /// Persist model settings, creating the model if needed.
    fn save_settings(&self, settings: &ModelSettings) -> Result<(), WorkerError>;

    /// Load the trained artifact of a model, `None` when untrained.
    fn load_artifact(&self, name: &str) -> Result<Option<ModelArtifact>, WorkerError>;

    /// Replace the model's artifact as a whole.
    fn save_artifact(&self, name: &str, artifact: &ModelArtifact) -> Result<(), WorkerError>;
}

/// File-backed store keeping one directory per model.
///
/// Layout: `<root>/<model>/settings.json` and `<root>/<model>/artifact.json`.
/// Writes go to a temporary file first and are moved into place, so a
/// concurrent reader always sees either the old or the new document.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn model_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn write_atomic(&self, path: &Path, payload: &str) -> Result<(), WorkerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl ModelStore for FileStore {
    fn load_settings(&self, name: &str) -> Result<ModelSettings, WorkerError> {
        let path = self.model_dir(name).join("settings.json");
        if !path.exists() {
            return Err(WorkerError::UnknownModel(name.to_string()));
        }
        let payload = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&payload)?)
    }

    fn save_settings(&self, settings: &ModelSettings) -> Result<(), WorkerError> {
        let path = self.model_dir(&settings.name).join("settings.json");
        self.write_atomic(&path, &serde_json::to_string_pretty(settings)?)
    }

    fn load_artifact(&self, name: &str) -> Result<Option<ModelArtifact>, WorkerError> {
        let path = self.model_dir(name).join("artifact.json");
        if !path.exists() {
            return Ok(None);
        }
        let payload = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&payload)?))
    }

    fn save_artifact(&self, name: &str, artifact: &ModelArtifact) -> Result<(), WorkerError> {
        let path = self.model_dir(name).join("artifact.json");
        self.write_atomic(&path, &serde_json::to_string(artifact)?)
    }
}

//! Hyperparameter search driver trait definitions.

use crate::error::Result;
use crate::model::RawParams;
use serde::{Deserialize, Serialize};

/// One numeric dimension of a parameter space.
///
/// Categorical choices are exposed as integer dimensions over the choice
/// indexes; the space realizes them back into typed values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDimension {
    /// Dimension name.
    pub name: String,
    /// Inclusive lower bound.
    pub low: f64,
    /// Inclusive upper bound.
    pub high: f64,
    /// Whether samples must be integral.
    pub integer: bool,
}

/// Search space abstraction a driver samples from.
pub trait ParameterSpace: Send + Sync {
    /// The raw dimensions with their bounds.
    fn dimensions(&self) -> Vec<ParamDimension>;
}

/// Outcome status of one evaluated candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    Ok,
    Failed,
}

/// Feedback reported to a driver after a candidate evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Evaluation loss; `None` when the candidate failed.
    pub loss: Option<f64>,
    pub status: TrialStatus,
}

impl TrialOutcome {
    /// A successful evaluation with the given loss.
    pub fn ok(loss: f64) -> Self {
        Self {
            loss: Some(loss),
            status: TrialStatus::Ok,
        }
    }

    /// A failed evaluation, scored as non-viable.
    pub fn failed() -> Self {
        Self {
            loss: None,
            status: TrialStatus::Failed,
        }
    }
}

/// Trait for hyperparameter search drivers.
///
/// The pipeline drives the search through an ask/tell objective protocol:
/// `ask` proposes raw parameter values for the space, `tell` feeds back the
/// evaluation outcome. The driver's internal sampling strategy is its own
/// business.
pub trait SearchDriver: Send {
    /// Propose raw parameter values for the next candidate.
    fn ask(&mut self, space: &dyn ParameterSpace) -> Result<RawParams>;

    /// Report the outcome of an evaluated candidate.
    fn tell(&mut self, params: &RawParams, outcome: TrialOutcome);
}

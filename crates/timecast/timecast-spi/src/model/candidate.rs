//! Hyperparameter candidate types.

use crate::error::TimecastError;
use serde::{Deserialize, Serialize};

/// Raw numeric output of a search driver: parameter name/value pairs, one
/// per dimension of the parameter space.
pub type RawParams = Vec<(String, f64)>;

/// A single hyperparameter value after coercion.
///
/// Raw search values are numeric; a value is kept as an integer when it is
/// numerically an exact integer, else as a float. This coercion rule is part
/// of the search contract, not an implementation detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperParamValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl HyperParamValue {
    /// Coerce a raw numeric search value: integer if exact, else float.
    pub fn from_raw(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            HyperParamValue::Int(value as i64)
        } else {
            HyperParamValue::Float(value)
        }
    }

    /// The value as an integer, if it coerced to one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            HyperParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// A typed model configuration candidate.
///
/// Exactly two stack depths are defined: a one-layer and a two-layer
/// sequence-regressor stack. Integer width fields are bounded `[1, 100]` by
/// the default space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CandidateRepr", into = "CandidateRepr")]
pub enum HyperparameterCandidate {
    Depth1 {
        l1: i64,
        activation: String,
        loss_fct: String,
        optimizer: String,
    },
    Depth2 {
        l1: i64,
        l2: i64,
        activation: String,
        loss_fct: String,
        optimizer: String,
    },
}

impl HyperparameterCandidate {
    /// Stack depth (1 or 2).
    pub fn depth(&self) -> u8 {
        match self {
            HyperparameterCandidate::Depth1 { .. } => 1,
            HyperparameterCandidate::Depth2 { .. } => 2,
        }
    }

    /// First layer width.
    pub fn l1(&self) -> i64 {
        match self {
            HyperparameterCandidate::Depth1 { l1, .. }
            | HyperparameterCandidate::Depth2 { l1, .. } => *l1,
        }
    }

    /// Second layer width, when the stack has one.
    pub fn l2(&self) -> Option<i64> {
        match self {
            HyperparameterCandidate::Depth1 { .. } => None,
            HyperparameterCandidate::Depth2 { l2, .. } => Some(*l2),
        }
    }

    /// Activation function identifier.
    pub fn activation(&self) -> &str {
        match self {
            HyperparameterCandidate::Depth1 { activation, .. }
            | HyperparameterCandidate::Depth2 { activation, .. } => activation,
        }
    }

    /// Loss function identifier.
    pub fn loss_fct(&self) -> &str {
        match self {
            HyperparameterCandidate::Depth1 { loss_fct, .. }
            | HyperparameterCandidate::Depth2 { loss_fct, .. } => loss_fct,
        }
    }

    /// Optimizer identifier.
    pub fn optimizer(&self) -> &str {
        match self {
            HyperparameterCandidate::Depth1 { optimizer, .. }
            | HyperparameterCandidate::Depth2 { optimizer, .. } => optimizer,
        }
    }
}

/// Flattened wire representation used for the persisted `best_params` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CandidateRepr {
    depth: u8,
    l1: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    l2: Option<i64>,
    activation: String,
    loss_fct: String,
    optimizer: String,
}

impl From<HyperparameterCandidate> for CandidateRepr {
    fn from(candidate: HyperparameterCandidate) -> Self {
        match candidate {
            HyperparameterCandidate::Depth1 {
                l1,
                activation,
                loss_fct,
                optimizer,
            } => CandidateRepr {
                depth: 1,
                l1,
                l2: None,
                activation,
                loss_fct,
                optimizer,
            },
            HyperparameterCandidate::Depth2 {
                l1,
                l2,
                activation,
                loss_fct,
                optimizer,
            } => CandidateRepr {
                depth: 2,
                l1,
                l2: Some(l2),
                activation,
                loss_fct,
                optimizer,
            },
        }
    }
}

impl TryFrom<CandidateRepr> for HyperparameterCandidate {
    type Error = TimecastError;

    fn try_from(repr: CandidateRepr) -> Result<Self, Self::Error> {
        match (repr.depth, repr.l2) {
            (1, _) => Ok(HyperparameterCandidate::Depth1 {
                l1: repr.l1,
                activation: repr.activation,
                loss_fct: repr.loss_fct,
                optimizer: repr.optimizer,
            }),
            (2, Some(l2)) => Ok(HyperparameterCandidate::Depth2 {
                l1: repr.l1,
                l2,
                activation: repr.activation,
                loss_fct: repr.loss_fct,
                optimizer: repr.optimizer,
            }),
            (2, None) => Err(TimecastError::Invalid(
                "depth-2 candidate without l2".to_string(),
            )),
            (depth, _) => Err(TimecastError::Invalid(format!(
                "unsupported candidate depth {}",
                depth
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_exact_integer() {
        assert_eq!(HyperParamValue::from_raw(42.0), HyperParamValue::Int(42));
        assert_eq!(HyperParamValue::from_raw(-3.0), HyperParamValue::Int(-3));
    }

    #[test]
    fn test_coercion_non_integer_stays_float() {
        assert_eq!(HyperParamValue::from_raw(42.5), HyperParamValue::Float(42.5));
    }

    #[test]
    fn test_coercion_non_finite_stays_float() {
        assert!(matches!(
            HyperParamValue::from_raw(f64::NAN),
            HyperParamValue::Float(_)
        ));
    }

    #[test]
    fn test_candidate_accessors() {
        let candidate = HyperparameterCandidate::Depth2 {
            l1: 30,
            l2: 12,
            activation: "tanh".to_string(),
            loss_fct: "mean_squared_error".to_string(),
            optimizer: "adam".to_string(),
        };
        assert_eq!(candidate.depth(), 2);
        assert_eq!(candidate.l1(), 30);
        assert_eq!(candidate.l2(), Some(12));
        assert_eq!(candidate.activation(), "tanh");
    }

    #[test]
    fn test_candidate_serde_round_trip() {
        let candidate = HyperparameterCandidate::Depth1 {
            l1: 7,
            activation: "tanh".to_string(),
            loss_fct: "mean_squared_error".to_string(),
            optimizer: "adam".to_string(),
        };
        let json = serde_json::to_string(&candidate).unwrap();
        assert!(json.contains("\"depth\":1"));
        assert!(!json.contains("l2"));
        let back: HyperparameterCandidate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, candidate);
    }

    #[test]
    fn test_depth2_without_l2_rejected() {
        let json = r#"{"depth":2,"l1":5,"activation":"tanh","loss_fct":"mean_squared_error","optimizer":"adam"}"#;
        let parsed: Result<HyperparameterCandidate, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }
}

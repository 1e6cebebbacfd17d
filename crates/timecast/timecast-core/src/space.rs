//! Hyperparameter candidate space.

use timecast_spi::{
    HyperParamValue, HyperparameterCandidate, ParamDimension, ParameterSpace, RawParams, Result,
    TimecastError,
};

/// The default candidate space: one-layer and two-layer sequence-regressor
/// stacks with integer widths in `[1, 100]`.
///
/// Categorical choices are single-valued in the default space but modeled
/// as index dimensions so the space can grow without changing the driver
/// protocol.
#[derive(Debug, Clone)]
pub struct HyperparameterSpace {
    max_width: i64,
    activations: Vec<String>,
    loss_fcts: Vec<String>,
    optimizers: Vec<String>,
}

impl Default for HyperparameterSpace {
    fn default() -> Self {
        Self {
            max_width: 100,
            activations: vec!["tanh".to_string()],
            loss_fcts: vec!["mean_squared_error".to_string()],
            optimizers: vec!["adam".to_string()],
        }
    }
}

impl HyperparameterSpace {
    /// Realize raw driver output into a typed candidate.
    ///
    /// Numeric values go through the integer-if-exact coercion rule; a
    /// width that does not coerce to an integer, or falls outside the
    /// space bounds, makes the candidate non-viable.
    pub fn realize(&self, raw: &RawParams) -> Result<HyperparameterCandidate> {
        let depth = self.int_param(raw, "depth")?;
        let l1 = self.width_param(raw, "l1")?;
        let activation = self.choice_param(raw, "activation", &self.activations)?;
        let loss_fct = self.choice_param(raw, "loss_fct", &self.loss_fcts)?;
        let optimizer = self.choice_param(raw, "optimizer", &self.optimizers)?;

        match depth {
            1 => Ok(HyperparameterCandidate::Depth1 {
                l1,
                activation,
                loss_fct,
                optimizer,
            }),
            2 => Ok(HyperparameterCandidate::Depth2 {
                l1,
                l2: self.width_param(raw, "l2")?,
                activation,
                loss_fct,
                optimizer,
            }),
            other => Err(TimecastError::Invalid(format!(
                "unsupported candidate depth {}",
                other
            ))),
        }
    }

    fn raw_value(&self, raw: &RawParams, name: &str) -> Result<f64> {
        raw.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| TimecastError::Invalid(format!("missing search parameter '{}'", name)))
    }

    fn int_param(&self, raw: &RawParams, name: &str) -> Result<i64> {
        let value = self.raw_value(raw, name)?;
        HyperParamValue::from_raw(value).as_int().ok_or_else(|| {
            TimecastError::Invalid(format!("parameter '{}' is not an integer: {}", name, value))
        })
    }

    fn width_param(&self, raw: &RawParams, name: &str) -> Result<i64> {
        let width = self.int_param(raw, name)?;
        if (1..=self.max_width).contains(&width) {
            Ok(width)
        } else {
            Err(TimecastError::Invalid(format!(
                "parameter '{}' out of bounds [1, {}]: {}",
                name, self.max_width, width
            )))
        }
    }

    fn choice_param(&self, raw: &RawParams, name: &str, choices: &[String]) -> Result<String> {
        let index = self.int_param(raw, name)?;
        choices
            .get(index as usize)
            .cloned()
            .ok_or_else(|| TimecastError::Invalid(format!("choice '{}' index {} out of range", name, index)))
    }
}

impl ParameterSpace for HyperparameterSpace {
    fn dimensions(&self) -> Vec<ParamDimension> {
        vec![
            ParamDimension {
                name: "depth".to_string(),
                low: 1.0,
                high: 2.0,
                integer: true,
            },
            ParamDimension {
                name: "l1".to_string(),
                low: 1.0,
                high: self.max_width as f64,
                integer: true,
            },
            ParamDimension {
                name: "l2".to_string(),
                low: 1.0,
                high: self.max_width as f64,
                integer: true,
            },
            ParamDimension {
                name: "activation".to_string(),
                low: 0.0,
                high: (self.activations.len() - 1) as f64,
                integer: true,
            },
            ParamDimension {
                name: "loss_fct".to_string(),
                low: 0.0,
                high: (self.loss_fcts.len() - 1) as f64,
                integer: true,
            },
            ParamDimension {
                name: "optimizer".to_string(),
                low: 0.0,
                high: (self.optimizers.len() - 1) as f64,
                integer: true,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(depth: f64, l1: f64, l2: f64) -> RawParams {
        vec![
            ("depth".to_string(), depth),
            ("l1".to_string(), l1),
            ("l2".to_string(), l2),
            ("activation".to_string(), 0.0),
            ("loss_fct".to_string(), 0.0),
            ("optimizer".to_string(), 0.0),
        ]
    }

    #[test]
    fn test_realize_depth1() {
        let space = HyperparameterSpace::default();
        let candidate = space.realize(&raw(1.0, 42.0, 7.0)).unwrap();

        assert_eq!(candidate.depth(), 1);
        assert_eq!(candidate.l1(), 42);
        assert_eq!(candidate.l2(), None);
        assert_eq!(candidate.activation(), "tanh");
        assert_eq!(candidate.loss_fct(), "mean_squared_error");
        assert_eq!(candidate.optimizer(), "adam");
    }

    #[test]
    fn test_realize_depth2() {
        let space = HyperparameterSpace::default();
        let candidate = space.realize(&raw(2.0, 30.0, 12.0)).unwrap();

        assert_eq!(candidate.depth(), 2);
        assert_eq!(candidate.l2(), Some(12));
    }

    #[test]
    fn test_realize_rejects_fractional_width() {
        let space = HyperparameterSpace::default();
        assert!(space.realize(&raw(1.0, 42.5, 7.0)).is_err());
    }

    #[test]
    fn test_realize_rejects_out_of_bounds_width() {
        let space = HyperparameterSpace::default();
        assert!(space.realize(&raw(1.0, 0.0, 7.0)).is_err());
        assert!(space.realize(&raw(1.0, 101.0, 7.0)).is_err());
    }

    #[test]
    fn test_realize_rejects_unknown_depth() {
        let space = HyperparameterSpace::default();
        assert!(space.realize(&raw(3.0, 42.0, 7.0)).is_err());
    }

    #[test]
    fn test_dimensions_cover_both_shapes() {
        let space = HyperparameterSpace::default();
        let dims = space.dimensions();
        let names: Vec<&str> = dims.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["depth", "l1", "l2", "activation", "loss_fct", "optimizer"]
        );
        assert!(dims.iter().all(|d| d.integer));
    }
}

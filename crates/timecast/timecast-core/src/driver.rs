//! Reference random search driver.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use timecast_spi::{ParameterSpace, RawParams, Result, SearchDriver, TrialOutcome};

/// A search driver sampling each dimension uniformly at random.
///
/// Random search ignores `tell` feedback; it exists as the bundled
/// conforming implementation of the ask/tell protocol, and as the default
/// driver for tests and small search budgets.
pub struct RandomSearchDriver {
    rng: StdRng,
}

impl RandomSearchDriver {
    /// Create a driver seeded from entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministic driver for reproducible searches.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSearchDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchDriver for RandomSearchDriver {
    fn ask(&mut self, space: &dyn ParameterSpace) -> Result<RawParams> {
        Ok(space
            .dimensions()
            .into_iter()
            .map(|dim| {
                let value = if dim.integer {
                    self.rng.gen_range(dim.low as i64..=dim.high as i64) as f64
                } else {
                    self.rng.gen_range(dim.low..=dim.high)
                };
                (dim.name, value)
            })
            .collect())
    }

    fn tell(&mut self, _params: &RawParams, _outcome: TrialOutcome) {
        // Random sampling does not adapt to feedback.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::HyperparameterSpace;

    #[test]
    fn test_ask_respects_bounds() {
        let space = HyperparameterSpace::default();
        let mut driver = RandomSearchDriver::with_seed(7);

        for _ in 0..50 {
            let raw = driver.ask(&space).unwrap();
            for (dim, (name, value)) in space.dimensions().iter().zip(raw.iter()) {
                assert_eq!(&dim.name, name);
                assert!(*value >= dim.low && *value <= dim.high);
                assert_eq!(value.fract(), 0.0);
            }
        }
    }

    #[test]
    fn test_ask_is_deterministic_with_seed() {
        let space = HyperparameterSpace::default();
        let mut a = RandomSearchDriver::with_seed(42);
        let mut b = RandomSearchDriver::with_seed(42);
        assert_eq!(a.ask(&space).unwrap(), b.ask(&space).unwrap());
    }

    #[test]
    fn test_sampled_params_always_realize() {
        let space = HyperparameterSpace::default();
        let mut driver = RandomSearchDriver::with_seed(1);
        for _ in 0..20 {
            let raw = driver.ask(&space).unwrap();
            assert!(space.realize(&raw).is_ok());
        }
    }
}

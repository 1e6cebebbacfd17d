//! Hyperparameter search orchestration.

use crate::space::HyperparameterSpace;
use tracing::{debug, info, warn};

use timecast_spi::{
    FitOptions, HyperparameterCandidate, ProgressSink, RawParams, RegressorFactory, Result,
    SearchDriver, SequenceRegressor, TimecastError, TrialOutcome, WindowSet,
};

/// Result of a completed hyperparameter search.
#[derive(Debug)]
pub struct SearchOutcome {
    /// The best-scoring candidate.
    pub best_candidate: HyperparameterCandidate,
    /// Evaluation loss of the final regressor on the held-out windows.
    pub best_score: f64,
    /// The final regressor, re-fitted from scratch with the best candidate.
    pub regressor: Box<dyn SequenceRegressor>,
    /// Final regressor predictions over the held-out windows.
    pub test_predicted: Vec<Vec<f64>>,
}

/// Drives a pluggable search algorithm over the hyperparameter space.
///
/// Each candidate is evaluated with a fresh regressor; a failing candidate
/// is reported back to the driver as non-viable and never aborts the
/// search. Only when every candidate in the budget fails does the search
/// itself fail.
pub struct SearchOrchestrator<'a> {
    space: HyperparameterSpace,
    driver: &'a mut dyn SearchDriver,
    factory: &'a dyn RegressorFactory,
}

impl<'a> SearchOrchestrator<'a> {
    /// Create an orchestrator over the default space.
    pub fn new(driver: &'a mut dyn SearchDriver, factory: &'a dyn RegressorFactory) -> Self {
        Self {
            space: HyperparameterSpace::default(),
            driver,
            factory,
        }
    }

    /// Run up to `max_evals` candidate evaluations, then re-fit the best
    /// candidate for the final artifact.
    ///
    /// Progress is reported after every completed evaluation; delivery
    /// failures are ignored.
    pub fn run(
        &mut self,
        train: &WindowSet,
        test: &WindowSet,
        nb_features: usize,
        fit: FitOptions,
        max_evals: usize,
        progress: &dyn ProgressSink,
    ) -> Result<SearchOutcome> {
        let mut best: Option<(HyperparameterCandidate, f64)> = None;

        for eval in 0..max_evals {
            let raw = self.driver.ask(&self.space)?;
            let outcome = match self.try_candidate(&raw, train, test, nb_features, fit) {
                Ok((candidate, loss)) => {
                    debug!(eval, loss, "candidate evaluated");
                    let better = best.as_ref().map_or(true, |(_, b)| loss < *b);
                    if better {
                        best = Some((candidate, loss));
                    }
                    TrialOutcome::ok(loss)
                }
                Err(e) => {
                    warn!(eval, error = %e, "iteration failed");
                    TrialOutcome::failed()
                }
            };
            self.driver.tell(&raw, outcome);

            // Fire-and-forget progress signal
            let _ = progress.report(eval + 1, max_evals);
        }

        let (best_candidate, _) = best.ok_or(TimecastError::SearchFailed {
            attempted: max_evals,
        })?;

        info!(?best_candidate, "search complete, fitting final regressor");

        // Second training pass with the winning hyperparameters, not a
        // reuse of the in-loop model.
        let mut regressor = self.factory.build(&best_candidate, nb_features)?;
        regressor.fit(train, test, fit)?;
        let best_score = regressor.evaluate(&test.x, &test.y)?;
        let test_predicted = regressor.predict(&test.x)?;

        Ok(SearchOutcome {
            best_candidate,
            best_score,
            regressor,
            test_predicted,
        })
    }

    fn try_candidate(
        &self,
        raw: &RawParams,
        train: &WindowSet,
        test: &WindowSet,
        nb_features: usize,
        fit: FitOptions,
    ) -> Result<(HyperparameterCandidate, f64)> {
        let candidate = self.space.realize(raw)?;
        let mut regressor = self.factory.build(&candidate, nb_features)?;
        regressor.fit(train, test, fit)?;
        let loss = regressor.evaluate(&test.x, &test.y)?;
        if !loss.is_finite() {
            return Err(TimecastError::Regressor(format!(
                "non-finite evaluation loss {}",
                loss
            )));
        }
        Ok((candidate, loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::WindowDatasetBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use timecast_spi::{DiscardProgress, ParameterSpace, RegressorBlob, TrialStatus, Window};

    struct ScriptedDriver {
        asks: Vec<RawParams>,
        next: usize,
        told: Vec<TrialOutcome>,
    }

    impl ScriptedDriver {
        fn new(asks: Vec<RawParams>) -> Self {
            Self {
                asks,
                next: 0,
                told: Vec::new(),
            }
        }
    }

    impl SearchDriver for ScriptedDriver {
        fn ask(&mut self, _space: &dyn ParameterSpace) -> Result<RawParams> {
            let raw = self.asks[self.next % self.asks.len()].clone();
            self.next += 1;
            Ok(raw)
        }

        fn tell(&mut self, _params: &RawParams, outcome: TrialOutcome) {
            self.told.push(outcome);
        }
    }

    /// Regressor whose evaluation loss equals its configured width, so the
    /// search outcome is fully predictable.
    #[derive(Debug)]
    struct StubRegressor {
        loss: f64,
        fail: bool,
    }

    impl SequenceRegressor for StubRegressor {
        fn fit(&mut self, _train: &WindowSet, _val: &WindowSet, _opts: FitOptions) -> Result<()> {
            if self.fail {
                Err(TimecastError::Regressor("forced failure".to_string()))
            } else {
                Ok(())
            }
        }

        fn evaluate(&self, _x: &[Window], _y: &[Vec<f64>]) -> Result<f64> {
            Ok(self.loss)
        }

        fn predict(&self, x: &[Window]) -> Result<Vec<Vec<f64>>> {
            Ok(vec![vec![self.loss]; x.len()])
        }

        fn save(&self) -> Result<RegressorBlob> {
            Ok(RegressorBlob {
                graph: vec![],
                weights: vec![],
            })
        }
    }

    struct StubFactory {
        fail_all: bool,
        builds: AtomicUsize,
    }

    impl RegressorFactory for StubFactory {
        fn build(
            &self,
            candidate: &HyperparameterCandidate,
            _nb_features: usize,
        ) -> Result<Box<dyn SequenceRegressor>> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(StubRegressor {
                loss: candidate.l1() as f64,
                fail: self.fail_all,
            }))
        }

        fn restore(
            &self,
            _blob: &RegressorBlob,
            _loss_fct: &str,
            _optimizer: &str,
        ) -> Result<Box<dyn SequenceRegressor>> {
            Err(TimecastError::Regressor("not supported".to_string()))
        }
    }

    fn raw(l1: f64) -> RawParams {
        vec![
            ("depth".to_string(), 1.0),
            ("l1".to_string(), l1),
            ("l2".to_string(), 1.0),
            ("activation".to_string(), 0.0),
            ("loss_fct".to_string(), 0.0),
            ("optimizer".to_string(), 0.0),
        ]
    }

    fn sample_windows() -> WindowSet {
        let dataset: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64 / 20.0]).collect();
        WindowDatasetBuilder::new(3).format(&dataset)
    }

    struct CountingSink(AtomicUsize);

    impl ProgressSink for CountingSink {
        fn report(&self, _current_eval: usize, _max_evals: usize) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_best_candidate_selected_by_lowest_loss() {
        let windows = sample_windows();
        let mut driver = ScriptedDriver::new(vec![raw(40.0), raw(5.0), raw(20.0)]);
        let factory = StubFactory {
            fail_all: false,
            builds: AtomicUsize::new(0),
        };
        let mut orchestrator = SearchOrchestrator::new(&mut driver, &factory);

        let outcome = orchestrator
            .run(
                &windows,
                &windows,
                1,
                FitOptions::default(),
                3,
                &DiscardProgress,
            )
            .unwrap();

        assert_eq!(outcome.best_candidate.l1(), 5);
        assert_eq!(outcome.best_score, 5.0);
        // 3 in-loop builds plus the final re-fit.
        assert_eq!(factory.builds.load(Ordering::SeqCst), 4);
        assert_eq!(outcome.test_predicted.len(), windows.len());
    }

    #[test]
    fn test_all_candidates_failing_is_aggregate_error() {
        let windows = sample_windows();
        let mut driver = ScriptedDriver::new(vec![raw(10.0)]);
        let factory = StubFactory {
            fail_all: true,
            builds: AtomicUsize::new(0),
        };
        let mut orchestrator = SearchOrchestrator::new(&mut driver, &factory);

        let err = orchestrator
            .run(
                &windows,
                &windows,
                1,
                FitOptions::default(),
                5,
                &DiscardProgress,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            TimecastError::SearchFailed { attempted: 5 }
        ));
        // Every failure was still reported back to the driver.
        assert_eq!(driver.told.len(), 5);
        assert!(driver
            .told
            .iter()
            .all(|o| o.loss.is_none() && o.status == TrialStatus::Failed));
    }

    #[test]
    fn test_single_success_among_failures_is_selected() {
        let windows = sample_windows();
        // An invalid width (0) makes realization fail; only the middle
        // candidate is viable.
        let mut driver = ScriptedDriver::new(vec![raw(0.0), raw(15.0), raw(200.0)]);
        let factory = StubFactory {
            fail_all: false,
            builds: AtomicUsize::new(0),
        };
        let mut orchestrator = SearchOrchestrator::new(&mut driver, &factory);

        let outcome = orchestrator
            .run(
                &windows,
                &windows,
                1,
                FitOptions::default(),
                3,
                &DiscardProgress,
            )
            .unwrap();

        assert_eq!(outcome.best_candidate.l1(), 15);
    }

    #[test]
    fn test_progress_reported_after_every_evaluation() {
        let windows = sample_windows();
        let mut driver = ScriptedDriver::new(vec![raw(10.0)]);
        let factory = StubFactory {
            fail_all: false,
            builds: AtomicUsize::new(0),
        };
        let sink = CountingSink(AtomicUsize::new(0));
        let mut orchestrator = SearchOrchestrator::new(&mut driver, &factory);

        orchestrator
            .run(&windows, &windows, 1, FitOptions::default(), 4, &sink)
            .unwrap();

        assert_eq!(sink.0.load(Ordering::SeqCst), 4);
    }
}

//! Time-series model orchestration: train, predict, forecast.

use std::collections::BTreeMap;
use tracing::{debug, info};

use timecast_api::{Constraint, ConstraintType, ConstraintViolation, ModelSettings, TrainConfig};
use timecast_spi::{
    FitOptions, ModelArtifact, ProgressSink, RegressorFactory, Result, SearchDriver,
    TimecastError, TimesDataSource, TimesPrediction,
};

use crate::artifact::ArtifactCodec;
use crate::dataset::{SplitBuilder, WindowDatasetBuilder};
use crate::normalize::Normalizer;
use crate::search::SearchOrchestrator;

/// A forecast with its constraint check result.
#[derive(Debug, Clone)]
pub struct TimesForecast {
    /// The underlying prediction.
    pub prediction: TimesPrediction,
    /// Buckets whose forecasted value crossed the constraint threshold.
    /// Empty when no constraint was given or none was violated.
    pub violations: Vec<ConstraintViolation>,
}

/// A bucketed time-series model.
///
/// Holds validated settings and, once trained, the artifact the predict
/// path restores its regressor from. Training replaces the artifact as a
/// whole.
pub struct TimeSeriesModel {
    settings: ModelSettings,
    artifact: Option<ModelArtifact>,
}

impl TimeSeriesModel {
    /// Create an untrained model from validated settings.
    pub fn new(settings: ModelSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            artifact: None,
        })
    }

    /// Recreate a trained model from its persisted artifact.
    pub fn from_artifact(settings: ModelSettings, artifact: ModelArtifact) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            artifact: Some(artifact),
        })
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// The current artifact, if the model has been trained.
    pub fn artifact(&self) -> Option<&ModelArtifact> {
        self.artifact.as_ref()
    }

    pub fn is_trained(&self) -> bool {
        self.artifact.is_some()
    }

    /// Train the model over `[from_date, to_date]`, defaulting each open
    /// bound to the data source's data bounds.
    ///
    /// Runs the full pipeline: dense extraction, normalization fitted on
    /// the training data, chronological split, hyperparameter search, and
    /// a final re-fit serialized into a fresh artifact. Returns the final
    /// evaluation loss on the held-out windows.
    pub fn train(
        &mut self,
        source: &dyn TimesDataSource,
        from_date: Option<i64>,
        to_date: Option<i64>,
        config: TrainConfig,
        factory: &dyn RegressorFactory,
        driver: &mut dyn SearchDriver,
        progress: &dyn ProgressSink,
    ) -> Result<f64> {
        let from_ts = match from_date {
            Some(ts) => ts,
            None => source.get_times_start(&self.settings.index)?,
        };
        let to_ts = match to_date {
            Some(ts) => ts,
            None => source.get_times_end(&self.settings.index)?,
        };

        info!(
            model = %self.settings.name,
            source = source.name(),
            from_ts,
            to_ts,
            max_evals = config.max_evals,
            "training model"
        );

        let (dataset, found) = self.extract_dataset(source, from_ts, to_ts)?;
        if found == 0 {
            return Err(TimecastError::NoData { from_ts, to_ts });
        }
        debug!(nb_buckets = dataset.len(), nb_buckets_found = found, "dataset extracted");

        let params = Normalizer::fit(&dataset);
        let scaled = Normalizer::apply(&dataset, &params);

        let (train, test) = SplitBuilder::new(self.settings.span).split(&scaled, config.train_size);
        if train.is_empty() || test.is_empty() {
            return Err(TimecastError::Invalid(format!(
                "not enough data to train with span {}: {} train / {} test samples",
                self.settings.span,
                train.len(),
                test.len()
            )));
        }

        let fit = FitOptions {
            num_epochs: config.num_epochs,
            batch_size: config.batch_size,
            ..FitOptions::default()
        };
        let mut orchestrator = SearchOrchestrator::new(driver, factory);
        let outcome = orchestrator.run(
            &train,
            &test,
            self.settings.nb_features(),
            fit,
            config.max_evals,
            progress,
        )?;

        self.artifact = Some(ArtifactCodec::serialize(
            outcome.regressor.as_ref(),
            &params,
            &outcome.best_candidate,
        )?);

        info!(
            model = %self.settings.name,
            score = outcome.best_score,
            "training complete"
        );
        Ok(outcome.best_score)
    }

    /// Predict values for every bucket in `[from_ts, to_ts]`.
    ///
    /// The queried range is extended `span` buckets into the past so the
    /// first requested bucket has full context. Output series cover the
    /// requested range only; buckets without enough contiguous history
    /// carry `None`.
    pub fn predict(
        &self,
        source: &dyn TimesDataSource,
        from_ts: i64,
        to_ts: i64,
        factory: &dyn RegressorFactory,
    ) -> Result<TimesPrediction> {
        let artifact = self.artifact.as_ref().ok_or(TimecastError::ModelNotTrained)?;
        let (regressor, params) = ArtifactCodec::deserialize(artifact, factory)?;

        let span = self.settings.span;
        let bucket_interval = self.settings.bucket_interval as i64;
        let hist_from = from_ts - span as i64 * bucket_interval;

        debug!(model = %self.settings.name, from_ts, to_ts, hist_from, "predicting");

        let (mut dataset, found) = self.extract_dataset(source, hist_from, to_ts)?;
        if found == 0 {
            return Err(TimecastError::NoData { from_ts, to_ts });
        }
        if found <= span {
            return Err(TimecastError::Invalid(format!(
                "not enough data to predict: {} buckets found, span is {}",
                found, span
            )));
        }
        dataset.truncate(found);

        let scaled = Normalizer::apply(&dataset, &params);
        let set = WindowDatasetBuilder::new(span).format(&scaled);

        let predicted = Normalizer::invert(&regressor.predict(&set.x)?, &params);
        let observed = Normalizer::invert(&set.y, &params);

        // Scatter the sparse samples back onto the requested bucket axis.
        let out_len = found - span;
        let timestamps: Vec<i64> = (0..out_len)
            .map(|i| hist_from + (span + i) as i64 * bucket_interval)
            .collect();

        let mut observed_series = BTreeMap::new();
        let mut predicted_series = BTreeMap::new();
        for (j, name) in self.settings.feature_names().into_iter().enumerate() {
            let mut obs = vec![None; out_len];
            let mut pred = vec![None; out_len];
            for (k, &index) in set.indexes.iter().enumerate() {
                let pos = index - span;
                obs[pos] = Some(observed[k][j]);
                pred[pos] = Some(predicted[k][j]);
            }
            observed_series.insert(name.clone(), obs);
            predicted_series.insert(name, pred);
        }

        Ok(TimesPrediction {
            timestamps,
            observed: observed_series,
            predicted: predicted_series,
        })
    }

    /// Predict and check the result against an optional constraint.
    pub fn forecast(
        &self,
        source: &dyn TimesDataSource,
        from_ts: i64,
        to_ts: i64,
        factory: &dyn RegressorFactory,
        constraint: Option<&Constraint>,
    ) -> Result<TimesForecast> {
        let prediction = self.predict(source, from_ts, to_ts, factory)?;
        let violations = match constraint {
            Some(constraint) => Self::check_constraint(&prediction, constraint)?,
            None => Vec::new(),
        };
        if !violations.is_empty() {
            info!(
                model = %self.settings.name,
                feature = %constraint.map(|c| c.feature.as_str()).unwrap_or(""),
                count = violations.len(),
                "forecast constraint violated"
            );
        }
        Ok(TimesForecast {
            prediction,
            violations,
        })
    }

    fn check_constraint(
        prediction: &TimesPrediction,
        constraint: &Constraint,
    ) -> Result<Vec<ConstraintViolation>> {
        let series = prediction
            .predicted
            .get(&constraint.feature)
            .ok_or_else(|| {
                TimecastError::Invalid(format!(
                    "unknown constraint feature '{}'",
                    constraint.feature
                ))
            })?;

        let mut violations = Vec::new();
        for (i, value) in series.iter().enumerate() {
            let Some(value) = value else { continue };
            let violated = match constraint.constraint_type {
                ConstraintType::Low => *value < constraint.threshold,
                ConstraintType::High => *value > constraint.threshold,
            };
            if violated {
                violations.push(ConstraintViolation {
                    timestamp: prediction.timestamps[i],
                    value: *value,
                });
            }
        }
        Ok(violations)
    }

    /// Extract a dense dataset covering every bucket in `[from_ts, to_ts]`.
    ///
    /// Rows for buckets the source omitted stay `NaN`. Returns the dataset
    /// and the number of leading buckets up to the last one found.
    fn extract_dataset(
        &self,
        source: &dyn TimesDataSource,
        from_ts: i64,
        to_ts: i64,
    ) -> Result<(Vec<Vec<f64>>, usize)> {
        if to_ts < from_ts {
            return Err(TimecastError::Invalid(format!(
                "invalid time range {}-{}",
                from_ts, to_ts
            )));
        }

        let bucket_interval = self.settings.bucket_interval as i64;
        let nb_buckets = ((to_ts - from_ts) / bucket_interval + 1) as usize;
        let nb_features = self.settings.nb_features();

        let mut dataset = vec![vec![f64::NAN; nb_features]; nb_buckets];
        let mut found = 0;

        let buckets = source.get_times_data(&self.settings.feature_names(), from_ts, to_ts)?;
        for bucket in buckets {
            if bucket.values.len() != nb_features {
                return Err(TimecastError::DataSource(format!(
                    "bucket at {} has {} values, expected {}",
                    bucket.ts,
                    bucket.values.len(),
                    nb_features
                )));
            }
            let pos = (bucket.ts - from_ts) / bucket_interval;
            if pos < 0 || pos as usize >= nb_buckets {
                continue;
            }
            dataset[pos as usize] = bucket.values;
            found = found.max(pos as usize + 1);
        }

        Ok((dataset, found))
    }
}

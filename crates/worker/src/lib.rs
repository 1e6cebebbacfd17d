//! Timecast Worker
//!
//! Runs timecast jobs against a model store and a data source, publishing
//! job state and search progress as messages.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::info;

use timecast::{
    Constraint, OutputFormat, RandomSearchDriver, RegressorFactory, TimeSeriesModel,
    TimecastError, TimesDataSource, TrainConfig,
};

mod queue;
mod storage;

pub use queue::{JobMessage, JobProgress, JobSink, JobState, MemorySink, QueueProgress, StdoutSink};
pub use storage::{FileStore, ModelStore};

/// Worker-level error.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("pipeline error: {0}")]
    Pipeline(#[from] TimecastError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("queue error: {0}")]
    Queue(String),

    #[error("unknown model '{0}'")]
    UnknownModel(String),
}

/// One job to run, as received from the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum JobRequest {
    /// Train a model over an optional explicit range.
    Train {
        model: String,
        #[serde(default)]
        from_ts: Option<i64>,
        #[serde(default)]
        to_ts: Option<i64>,
        #[serde(default)]
        config: TrainConfig,
    },
    /// Predict values over a range.
    Predict {
        model: String,
        from_ts: i64,
        to_ts: i64,
        #[serde(default)]
        format: OutputFormat,
        #[serde(default)]
        save_prediction: bool,
    },
    /// Predict and check the result against an optional constraint.
    Forecast {
        model: String,
        from_ts: i64,
        to_ts: i64,
        #[serde(default)]
        format: OutputFormat,
        #[serde(default)]
        constraint: Option<Constraint>,
        #[serde(default)]
        save_prediction: bool,
    },
}

impl JobRequest {
    /// Name of the model the job targets.
    pub fn model(&self) -> &str {
        match self {
            JobRequest::Train { model, .. }
            | JobRequest::Predict { model, .. }
            | JobRequest::Forecast { model, .. } => model,
        }
    }
}

/// Runs jobs against its collaborators and reports their lifecycle.
pub struct Worker<'a> {
    store: &'a dyn ModelStore,
    source: &'a dyn TimesDataSource,
    factory: &'a dyn RegressorFactory,
    sink: &'a dyn JobSink,
}

impl<'a> Worker<'a> {
    pub fn new(
        store: &'a dyn ModelStore,
        source: &'a dyn TimesDataSource,
        factory: &'a dyn RegressorFactory,
        sink: &'a dyn JobSink,
    ) -> Self {
        Self {
            store,
            source,
            factory,
            sink,
        }
    }

    /// Run one job to completion, publishing running/done/failed states.
    ///
    /// Returns the job result document, also carried by the final done
    /// message.
    pub fn run(&self, job_id: &str, request: JobRequest) -> Result<serde_json::Value, WorkerError> {
        info!(job_id, model = request.model(), "job received");
        self.publish(JobMessage::state(job_id, JobState::Waiting));
        self.publish(JobMessage::state(job_id, JobState::Running));

        match self.execute(job_id, request) {
            Ok(result) => {
                info!(job_id, "job done");
                self.publish(JobMessage::state(job_id, JobState::Done).with_result(result.clone()));
                Ok(result)
            }
            Err(e) => {
                info!(job_id, error = %e, "job failed");
                self.publish(JobMessage::state(job_id, JobState::Failed).with_error(e.to_string()));
                Err(e)
            }
        }
    }

    fn execute(&self, job_id: &str, request: JobRequest) -> Result<serde_json::Value, WorkerError> {
        match request {
            JobRequest::Train {
                model,
                from_ts,
                to_ts,
                config,
            } => self.train(job_id, &model, from_ts, to_ts, config),
            JobRequest::Predict {
                model,
                from_ts,
                to_ts,
                format,
                save_prediction,
            } => {
                let prediction = self
                    .trained_model(&model)?
                    .predict(self.source, from_ts, to_ts, self.factory)?;
                if save_prediction {
                    self.source.save_timeseries_prediction(&prediction, &model)?;
                }
                Ok(Self::format_prediction(&prediction, format)?)
            }
            JobRequest::Forecast {
                model,
                from_ts,
                to_ts,
                format,
                constraint,
                save_prediction,
            } => {
                let forecast = self.trained_model(&model)?.forecast(
                    self.source,
                    from_ts,
                    to_ts,
                    self.factory,
                    constraint.as_ref(),
                )?;
                if save_prediction {
                    self.source
                        .save_timeseries_prediction(&forecast.prediction, &model)?;
                }
                Ok(json!({
                    "prediction": Self::format_prediction(&forecast.prediction, format)?,
                    "violations": forecast.violations,
                }))
            }
        }
    }

    fn train(
        &self,
        job_id: &str,
        name: &str,
        from_ts: Option<i64>,
        to_ts: Option<i64>,
        config: TrainConfig,
    ) -> Result<serde_json::Value, WorkerError> {
        let settings = self.store.load_settings(name)?;
        let mut model = TimeSeriesModel::new(settings)?;
        let mut driver = RandomSearchDriver::new();
        let progress = QueueProgress::new(self.sink, job_id);

        let score = model.train(
            self.source,
            from_ts,
            to_ts,
            config,
            self.factory,
            &mut driver,
            &progress,
        )?;

        // The artifact exists after a successful train.
        if let Some(artifact) = model.artifact() {
            self.store.save_artifact(name, artifact)?;
        }

        Ok(json!({"model": name, "score": score}))
    }

    fn trained_model(&self, name: &str) -> Result<TimeSeriesModel, WorkerError> {
        let settings = self.store.load_settings(name)?;
        let artifact = self
            .store
            .load_artifact(name)?
            .ok_or(TimecastError::ModelNotTrained)?;
        Ok(TimeSeriesModel::from_artifact(settings, artifact)?)
    }

    fn format_prediction(
        prediction: &timecast::TimesPrediction,
        format: OutputFormat,
    ) -> Result<serde_json::Value, WorkerError> {
        Ok(match format {
            OutputFormat::Series => serde_json::to_value(prediction.format_series())?,
            OutputFormat::Buckets => serde_json::to_value(prediction.format_buckets())?,
        })
    }

    fn publish(&self, message: JobMessage) {
        if let Err(e) = self.sink.send(&message) {
            tracing::warn!(error = %e, "job state delivery failed");
        }
    }
}

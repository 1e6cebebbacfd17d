//! Job state messages and the sink they are published through.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use timecast::ProgressSink;
use tracing::warn;

use crate::WorkerError;

/// Search progress carried inside a running-state message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    /// Evaluations completed so far.
    pub eval: usize,
    /// Total evaluation budget.
    pub max_evals: usize,
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Waiting,
    Running,
    Done,
    Failed,
}

/// One job state notification, published on every transition and on
/// every search progress tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMessage {
    /// Message discriminator, always `"job_state"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub job_id: String,
    pub state: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<JobProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl JobMessage {
    /// Create a state message with no payload.
    pub fn state(job_id: &str, state: JobState) -> Self {
        Self {
            kind: "job_state".to_string(),
            job_id: job_id.to_string(),
            state,
            progress: None,
            error: None,
            result: None,
        }
    }

    /// Attach search progress.
    pub fn with_progress(mut self, eval: usize, max_evals: usize) -> Self {
        self.progress = Some(JobProgress { eval, max_evals });
        self
    }

    /// Attach a result payload.
    pub fn with_result(mut self, result: serde_json::Value) -> Self {
        self.result = Some(result);
        self
    }

    /// Attach an error description.
    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }
}

/// Trait for job message consumers.
pub trait JobSink: Send + Sync {
    /// Deliver one message.
    fn send(&self, message: &JobMessage) -> Result<(), WorkerError>;
}

/// Sink printing each message as one JSON line on stdout.
pub struct StdoutSink;

impl JobSink for StdoutSink {
    fn send(&self, message: &JobMessage) -> Result<(), WorkerError> {
        println!("{}", serde_json::to_string(message)?);
        Ok(())
    }
}

/// Sink retaining messages in memory, for tests.
#[derive(Default)]
pub struct MemorySink {
    messages: Mutex<Vec<JobMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<JobMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl JobSink for MemorySink {
    fn send(&self, message: &JobMessage) -> Result<(), WorkerError> {
        self.messages
            .lock()
            .map_err(|_| WorkerError::Queue("sink poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}

/// Adapts a [`JobSink`] into the pipeline's progress capability.
///
/// Delivery is fire-and-forget: a failing sink is logged and never
/// interrupts the search.
pub struct QueueProgress<'a> {
    sink: &'a dyn JobSink,
    job_id: String,
}

impl<'a> QueueProgress<'a> {
    pub fn new(sink: &'a dyn JobSink, job_id: &str) -> Self {
        Self {
            sink,
            job_id: job_id.to_string(),
        }
    }
}

impl ProgressSink for QueueProgress<'_> {
    fn report(&self, current_eval: usize, max_evals: usize) -> timecast::Result<()> {
        let message =
            JobMessage::state(&self.job_id, JobState::Running).with_progress(current_eval, max_evals);
        if let Err(e) = self.sink.send(&message) {
            warn!(job_id = %self.job_id, error = %e, "progress delivery failed");
        }
        Ok(())
    }
}

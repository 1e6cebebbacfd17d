//! Progress reporting trait definition.

use crate::error::Result;

/// Sink for search progress signals.
///
/// Progress is the only asynchronous signal emitted during training and is
/// fire-and-forget: callers ignore delivery failures, a broken sink must
/// never abort the job.
pub trait ProgressSink: Send + Sync {
    /// Report that `current_eval` of `max_evals` evaluations completed.
    fn report(&self, current_eval: usize, max_evals: usize) -> Result<()>;
}

/// A sink that discards all progress signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardProgress;

impl ProgressSink for DiscardProgress {
    fn report(&self, _current_eval: usize, _max_evals: usize) -> Result<()> {
        Ok(())
    }
}

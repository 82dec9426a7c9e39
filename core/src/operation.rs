//! Progress and cancellation handle for a parse/compute run.
//!
//! Cancellation is cooperative and only observed at safe boundaries:
//! between pipeline stages and between per-actor statistic computations.
//! A cancelled run never leaves partially-applied mutations behind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

/// Shared handle the caller keeps to request cancellation.
#[derive(Debug, Clone, Default)]
pub struct Operation {
    cancelled: Arc<AtomicBool>,
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The pipeline notices at its next checkpoint.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Stage boundary: log progress and bail out if cancellation was
    /// requested.
    pub fn checkpoint(&self, stage: &'static str) -> Result<(), Cancelled> {
        debug!(stage, "pipeline checkpoint");
        if self.is_cancelled() {
            return Err(Cancelled { stage });
        }
        Ok(())
    }
}

/// Marker returned when a run was cancelled at the named stage.
#[derive(Debug, thiserror::Error)]
#[error("operation cancelled at stage `{stage}`")]
pub struct Cancelled {
    pub stage: &'static str,
}

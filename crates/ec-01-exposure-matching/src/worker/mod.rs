//! Worker Layer - Background run management
//!
//! A run executes the whole pipeline on a blocking thread. The owner talks to
//! it only through:
//! - `CancellationToken`: cooperative stop, checked once per key
//! - `MatchEvent` channel: progress and one terminal event
//! - `RunHandle::join`: the final report
//!
//! `RunSlot` keeps runs from overlapping.

mod cancellation;
mod events;
mod handle;
mod slot;

pub use cancellation::CancellationToken;
pub use events::MatchEvent;
pub use handle::RunHandle;
pub use slot::{RunPermit, RunSlot};

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use ec_telemetry::{log_run_event, subsystem_span};
use shared_types::DiagnosisKey;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::ObservationIndex;
use crate::error::MatchingError;
use crate::service::MatchPipeline;
use crate::SUBSYSTEM;

/// Spawns matching runs one at a time.
#[derive(Clone)]
pub struct MatchingWorker {
    pipeline: Arc<MatchPipeline>,
    slot: RunSlot,
}

impl MatchingWorker {
    pub fn new(pipeline: Arc<MatchPipeline>) -> Self {
        Self {
            pipeline,
            slot: RunSlot::new(),
        }
    }

    pub fn slot(&self) -> &RunSlot {
        &self.slot
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    /// Take the slot and start a run.
    ///
    /// # Errors
    ///
    /// `MatchingError::RunInProgress` if a run is still in flight.
    pub fn start(
        &self,
        keys: Arc<[DiagnosisKey]>,
        index: Arc<ObservationIndex>,
    ) -> Result<RunHandle, MatchingError> {
        let permit = self.slot.try_acquire()?;
        Ok(self.spawn(permit, keys, index))
    }

    /// Start a run with a permit taken earlier from this worker's slot.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        &self,
        permit: RunPermit,
        keys: Arc<[DiagnosisKey]>,
        index: Arc<ObservationIndex>,
    ) -> RunHandle {
        let id = Uuid::new_v4();
        let token = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let pipeline = Arc::clone(&self.pipeline);
        let run_token = token.clone();

        log_run_event!(
            info,
            SUBSYSTEM,
            "Starting matching run",
            id,
            keys = keys.len(),
            observations = index.len()
        );

        let join = tokio::task::spawn_blocking(move || {
            let _span = subsystem_span!("match_run", subsystem = SUBSYSTEM, run_id = %id).entered();
            let progress_tx = tx.clone();
            let result = catch_unwind(AssertUnwindSafe(|| {
                pipeline.execute(keys, &index, &run_token, |processed, total| {
                    // Receiver may be gone; progress is advisory.
                    let _ = progress_tx.send(MatchEvent::Progress { processed, total });
                })
            }));
            drop(permit);

            match result {
                Ok(report) => {
                    let _ = tx.send(MatchEvent::Completed {
                        partial: report.partial,
                    });
                    Ok(report)
                }
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "matching run panicked".to_string());
                    log_run_event!(error, SUBSYSTEM, "Matching run failed", id, reason = %reason);
                    let _ = tx.send(MatchEvent::Failed {
                        reason: reason.clone(),
                    });
                    Err(MatchingError::WorkerFailed(reason))
                }
            }
        });

        RunHandle::new(id, token, rx, join)
    }
}

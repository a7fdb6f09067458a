use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::MatchReport;
use crate::error::MatchingError;
use crate::worker::{CancellationToken, MatchEvent};

/// Owner's side of a background matching run.
///
/// Awaiting [`RunHandle::join`] is the "run has stopped" signal; the run slot
/// is free once it resolves.
#[derive(Debug)]
pub struct RunHandle {
    id: Uuid,
    token: CancellationToken,
    events: mpsc::UnboundedReceiver<MatchEvent>,
    join: JoinHandle<Result<MatchReport, MatchingError>>,
}

impl RunHandle {
    pub(crate) fn new(
        id: Uuid,
        token: CancellationToken,
        events: mpsc::UnboundedReceiver<MatchEvent>,
        join: JoinHandle<Result<MatchReport, MatchingError>>,
    ) -> Self {
        Self {
            id,
            token,
            events,
            join,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Request a cooperative stop after the current key.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Next event, or `None` once the run has dropped its sender.
    pub async fn next_event(&mut self) -> Option<MatchEvent> {
        self.events.recv().await
    }

    /// Event already queued, without waiting.
    pub fn try_next_event(&mut self) -> Option<MatchEvent> {
        self.events.try_recv().ok()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the run to stop and take its report.
    ///
    /// # Errors
    ///
    /// `MatchingError::WorkerFailed` if the run panicked or was aborted.
    pub async fn join(self) -> Result<MatchReport, MatchingError> {
        self.join
            .await
            .map_err(|e| MatchingError::WorkerFailed(format!("matching task failed: {e}")))?
    }
}

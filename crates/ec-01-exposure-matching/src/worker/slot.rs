use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

use crate::error::MatchingError;

/// Admits at most one matching run at a time.
#[derive(Debug, Clone)]
pub struct RunSlot {
    semaphore: Arc<Semaphore>,
}

/// Proof that the holder owns the run slot. Dropping it frees the slot.
#[derive(Debug)]
pub struct RunPermit {
    _permit: OwnedSemaphorePermit,
}

impl Default for RunSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSlot {
    pub fn new() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
        }
    }

    /// Take the slot.
    ///
    /// # Errors
    ///
    /// `MatchingError::RunInProgress` while another permit is alive.
    pub fn try_acquire(&self) -> Result<RunPermit, MatchingError> {
        match Arc::clone(&self.semaphore).try_acquire_owned() {
            Ok(permit) => Ok(RunPermit { _permit: permit }),
            Err(TryAcquireError::NoPermits) => Err(MatchingError::RunInProgress),
            Err(TryAcquireError::Closed) => {
                Err(MatchingError::WorkerFailed("run slot closed".to_string()))
            }
        }
    }

    /// Whether a run currently holds the slot.
    pub fn is_busy(&self) -> bool {
        self.semaphore.available_permits() == 0
    }
}

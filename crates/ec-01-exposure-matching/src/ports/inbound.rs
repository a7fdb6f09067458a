//! Inbound Ports (Driving Ports)
//!
//! The API that callers use to drive matching runs.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{DaySinceEpoch, DiagnosisKey};

use crate::domain::{KeyHistogram, MatchingConfig, ObservationIndex};
use crate::error::MatchingError;
use crate::worker::RunHandle;

/// Primary matching API (Driving Port)
#[async_trait]
pub trait MatchingApi: Send + Sync {
    /// Read the observation log and index it.
    ///
    /// # Errors
    /// Provider failures and corrupt records abort; an empty log does not.
    async fn load_index(&self) -> Result<Arc<ObservationIndex>, MatchingError>;

    /// Read the published diagnosis keys.
    async fn load_keys(&self) -> Result<Arc<[DiagnosisKey]>, MatchingError>;

    /// Load both inputs and start a background run.
    ///
    /// # Errors
    /// `MatchingError::RunInProgress` if a run has not stopped yet.
    async fn start_run(&self) -> Result<RunHandle, MatchingError>;

    /// Start a background run over inputs loaded earlier.
    fn start_run_with(
        &self,
        keys: Arc<[DiagnosisKey]>,
        index: Arc<ObservationIndex>,
    ) -> Result<RunHandle, MatchingError>;

    /// Observation counts for the configured history window, ending on the
    /// latest day present. Empty when there are no observations.
    fn observation_overview(&self, index: &ObservationIndex) -> Vec<(DaySinceEpoch, usize)>;

    /// Key counts per day over `first_day..=last_day`.
    fn key_histogram(
        &self,
        keys: &[DiagnosisKey],
        first_day: DaySinceEpoch,
        last_day: DaySinceEpoch,
    ) -> KeyHistogram;

    /// Active configuration.
    fn config(&self) -> &MatchingConfig;
}

//! Exposure Matching Service
//!
//! Implements `MatchingApi` on top of the two provider ports and a
//! single-slot background worker.

use std::sync::Arc;

use async_trait::async_trait;
use ec_telemetry::log_event;
use shared_types::{DaySinceEpoch, DiagnosisKey};
use tracing::debug;

use crate::domain::{diagnosis_key_histogram, KeyHistogram, MatchingConfig, ObservationIndex};
use crate::error::MatchingError;
use crate::metrics::Metrics;
use crate::ports::{DiagnosisKeyProvider, MatchingApi, ObservationLogProvider};
use crate::service::MatchPipeline;
use crate::worker::{MatchingWorker, RunHandle};
use crate::SUBSYSTEM;

/// Exposure Matching Service implementation
///
/// Implements the `MatchingApi` port using injected providers.
pub struct ExposureMatchingService<O: ObservationLogProvider, K: DiagnosisKeyProvider> {
    /// Observation log (driven port)
    log_provider: Arc<O>,
    /// Diagnosis keys (driven port)
    key_provider: Arc<K>,
    config: MatchingConfig,
    worker: MatchingWorker,
    metrics: Arc<Metrics>,
}

impl<O: ObservationLogProvider, K: DiagnosisKeyProvider> ExposureMatchingService<O, K> {
    /// Create a service with the default configuration
    pub fn new(log_provider: Arc<O>, key_provider: Arc<K>) -> Self {
        Self::build(log_provider, key_provider, MatchingConfig::default())
    }

    /// Create with a custom configuration
    ///
    /// # Errors
    /// `MatchingError::InvalidConfig` if the configuration does not validate.
    pub fn with_config(
        log_provider: Arc<O>,
        key_provider: Arc<K>,
        config: MatchingConfig,
    ) -> Result<Self, MatchingError> {
        config.validate()?;
        Ok(Self::build(log_provider, key_provider, config))
    }

    fn build(log_provider: Arc<O>, key_provider: Arc<K>, config: MatchingConfig) -> Self {
        let metrics = Arc::new(Metrics::new());
        let pipeline = MatchPipeline::with_metrics(config.clone(), metrics.clone());
        Self {
            log_provider,
            key_provider,
            config,
            worker: MatchingWorker::new(Arc::new(pipeline)),
            metrics,
        }
    }

    /// Counters accumulated over every run of this service
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Whether a run currently holds the slot
    pub fn is_running(&self) -> bool {
        self.worker.is_busy()
    }
}

#[async_trait]
impl<O, K> MatchingApi for ExposureMatchingService<O, K>
where
    O: ObservationLogProvider + 'static,
    K: DiagnosisKeyProvider + 'static,
{
    async fn load_index(&self) -> Result<Arc<ObservationIndex>, MatchingError> {
        let raw = self.log_provider.observations().await?;
        let index = ObservationIndex::try_build(&raw, self.config.time_zone_offset)?;
        debug!(
            observations = index.len(),
            identifiers = index.distinct_identifiers(),
            "[ec-01] Observation index built"
        );
        Ok(Arc::new(index))
    }

    async fn load_keys(&self) -> Result<Arc<[DiagnosisKey]>, MatchingError> {
        let keys = self.key_provider.diagnosis_keys().await?;
        debug!(keys = keys.len(), "[ec-01] Diagnosis keys loaded");
        Ok(keys.into())
    }

    async fn start_run(&self) -> Result<RunHandle, MatchingError> {
        // Take the slot before loading so a busy service fails fast.
        let permit = self.worker.slot().try_acquire()?;
        let index = self.load_index().await?;
        let keys = self.load_keys().await?;

        if index.is_empty() {
            log_event!(info, SUBSYSTEM, "Observation log is empty, matching not possible");
        }
        Ok(self.worker.spawn(permit, keys, index))
    }

    fn start_run_with(
        &self,
        keys: Arc<[DiagnosisKey]>,
        index: Arc<ObservationIndex>,
    ) -> Result<RunHandle, MatchingError> {
        self.worker.start(keys, index)
    }

    fn observation_overview(&self, index: &ObservationIndex) -> Vec<(DaySinceEpoch, usize)> {
        match index.last_day() {
            Some(last) => index.day_counts_window(last, self.config.history_days),
            None => Vec::new(),
        }
    }

    fn key_histogram(
        &self,
        keys: &[DiagnosisKey],
        first_day: DaySinceEpoch,
        last_day: DaySinceEpoch,
    ) -> KeyHistogram {
        diagnosis_key_histogram(keys, first_day, last_day)
    }

    fn config(&self) -> &MatchingConfig {
        &self.config
    }
}

//! In-memory providers
//!
//! Hold their data behind a `tokio::sync::RwLock` so a caller can swap the
//! log or key set between runs. The index must be rebuilt after a swap.

use async_trait::async_trait;
use shared_types::{DiagnosisKey, Observation, RawObservation};
use tokio::sync::RwLock;

use crate::error::ProviderError;
use crate::ports::{DiagnosisKeyProvider, ObservationLogProvider};

/// Observation log held in memory.
#[derive(Debug, Default)]
pub struct InMemoryObservationLog {
    observations: RwLock<Vec<RawObservation>>,
}

impl InMemoryObservationLog {
    pub fn new(observations: Vec<RawObservation>) -> Self {
        Self {
            observations: RwLock::new(observations),
        }
    }

    /// Build from already-typed observations.
    pub fn from_observations(observations: &[Observation]) -> Self {
        Self::new(
            observations
                .iter()
                .map(|o| RawObservation {
                    rpi: o.rpi.as_bytes().to_vec(),
                    metadata: o.metadata.as_bytes().to_vec(),
                    rssi: i32::from(o.rssi),
                    timestamp: o.timestamp,
                })
                .collect(),
        )
    }

    /// Replace the whole log.
    pub async fn replace(&self, observations: Vec<RawObservation>) {
        *self.observations.write().await = observations;
    }

    pub async fn push(&self, observation: RawObservation) {
        self.observations.write().await.push(observation);
    }
}

#[async_trait]
impl ObservationLogProvider for InMemoryObservationLog {
    async fn observations(&self) -> Result<Vec<RawObservation>, ProviderError> {
        Ok(self.observations.read().await.clone())
    }
}

/// Diagnosis keys held in memory.
#[derive(Debug, Default)]
pub struct InMemoryKeyProvider {
    keys: RwLock<Vec<DiagnosisKey>>,
}

impl InMemoryKeyProvider {
    pub fn new(keys: Vec<DiagnosisKey>) -> Self {
        Self {
            keys: RwLock::new(keys),
        }
    }

    pub async fn replace(&self, keys: Vec<DiagnosisKey>) {
        *self.keys.write().await = keys;
    }
}

#[async_trait]
impl DiagnosisKeyProvider for InMemoryKeyProvider {
    async fn diagnosis_keys(&self) -> Result<Vec<DiagnosisKey>, ProviderError> {
        Ok(self.keys.read().await.clone())
    }
}

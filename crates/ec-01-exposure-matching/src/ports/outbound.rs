//! Outbound Ports (Driven Ports)
//!
//! These traits define the data the matching subsystem needs from the
//! outside: the local observation log and the published diagnosis keys.
//! Neither port says anything about where the data lives.

use async_trait::async_trait;
use shared_types::{DiagnosisKey, RawObservation};

use crate::error::ProviderError;

/// Observation log provider (Driven Port)
///
/// An empty log is a legitimate answer (e.g. the store could not be read
/// without elevated privileges); the subsystem reports "matching not
/// possible" for it rather than failing.
#[async_trait]
pub trait ObservationLogProvider: Send + Sync {
    /// All recorded observations, in log order.
    async fn observations(&self) -> Result<Vec<RawObservation>, ProviderError>;
}

/// Diagnosis key provider (Driven Port)
///
/// Returns keys already decoded from the export container.
#[async_trait]
pub trait DiagnosisKeyProvider: Send + Sync {
    /// All published keys, in export order.
    async fn diagnosis_keys(&self) -> Result<Vec<DiagnosisKey>, ProviderError>;
}

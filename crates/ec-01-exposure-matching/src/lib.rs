//! # EC-01 Exposure Matching
//!
//! Matches published diagnosis keys against a locally recorded observation
//! log and summarizes the matches into encounters.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `KeyExpander`: Rolling identifiers and metadata key for one key
//!   - `ObservationIndex`: Identifier and day index over the log
//!   - `MetadataValidator`: Decrypts and checks transmit power metadata
//!   - `EncounterClusterer`: Gap-based bursts with a minimum-attenuation representative
//!   - `MatchingConfig`: Configuration with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `MatchingApi`: Driving port (inbound API)
//!   - `ObservationLogProvider`, `DiagnosisKeyProvider`: Driven ports
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `MatchEngine`: Expansion and lookup across all keys
//!   - `MatchPipeline`: Engine, validator and clusterer as one run
//!   - `ExposureMatchingService`: Implements `MatchingApi`
//!
//! - **Worker Layer** (`worker/`): Background runs
//!   - `MatchingWorker`, `RunHandle`, `RunSlot`, `CancellationToken`, `MatchEvent`
//!
//! - **Adapters Layer** (`adapters/`): In-memory providers
//!
//! ## Invariants
//!
//! - A key with rolling period `n` expands to `n` pairwise distinct identifiers.
//! - The result set does not depend on key order; only progress timing does.
//! - Every matched observation belongs to exactly one encounter; encounters
//!   are time-ordered and do not overlap.
//! - At most one run is in flight per worker.
//!
//! ## Usage Example
//!
//! ```ignore
//! use ec_01_exposure_matching::{
//!     ExposureMatchingService, InMemoryKeyProvider, InMemoryObservationLog, MatchEvent, MatchingApi,
//! };
//! use std::sync::Arc;
//!
//! let service = ExposureMatchingService::new(
//!     Arc::new(InMemoryObservationLog::new(observations)),
//!     Arc::new(InMemoryKeyProvider::new(keys)),
//! );
//!
//! let mut run = service.start_run().await?;
//! while let Some(event) = run.next_event().await {
//!     if let MatchEvent::Progress { processed, total } = event {
//!         println!("{processed}/{total}");
//!     }
//! }
//! let report = run.join().await?;
//! println!("{:?}", report.status());
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod worker;

/// Subsystem name carried on structured log events.
pub const SUBSYSTEM: &str = "ec-01-exposure-matching";

// Re-exports for convenience
pub use adapters::{InMemoryKeyProvider, InMemoryObservationLog};
pub use domain::{
    AttenuationBand, Encounter, EncounterClusterer, KeyExpander, KeyHistogram, MatchRecord,
    MatchReport, MatchStatus, MatchSummary, MatchedObservation, MatchingConfig,
    MatchingConfigBuilder, MetadataLayout, MetadataStatus, MetadataValidator, ObservationIndex,
    SkippedKey, ValidatedObservation,
};
pub use error::{KeyError, MatchingError, ProviderError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{DiagnosisKeyProvider, MatchingApi, ObservationLogProvider};
pub use service::{ExposureMatchingService, MatchEngine, MatchOutcome, MatchPipeline};
pub use worker::{CancellationToken, MatchEvent, MatchingWorker, RunHandle, RunSlot};

//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Key expansion (rolling identifiers, metadata keys)
//! - Observation index
//! - Metadata validation
//! - Encounter clustering
//! - Per-key summaries and daily aggregates
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod config;
pub mod encounter;
pub mod key_expander;
pub mod metadata;
pub mod observation_index;
pub mod records;
pub mod report;
pub mod summary;

pub use config::{MatchingConfig, MatchingConfigBuilder, MetadataLayout};
pub use encounter::{Encounter, EncounterClusterer};
pub use key_expander::{padded_data, KeyExpander, MetadataKey, AEMK_LABEL, RPIK_LABEL};
pub use metadata::{AttenuationBand, MetadataStatus, MetadataValidator, ValidatedObservation};
pub use observation_index::ObservationIndex;
pub use records::{MatchRecord, MatchedObservation, SkippedKey};
pub use report::{MatchReport, MatchStatus};
pub use summary::{
    daily_match_counts, diagnosis_key_histogram, total_matching_key_count, KeyHistogram,
    MatchSummary,
};

//! Per-key match results produced by the match engine.

use serde::{Deserialize, Serialize};
use shared_types::{IntervalNumber, Observation};

use crate::domain::key_expander::MetadataKey;
use crate::error::KeyError;

/// An observation whose identifier matched one derived for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedObservation {
    pub observation: Observation,
    /// Interval whose identifier matched.
    pub interval: IntervalNumber,
    /// Position in the observation log; breaks timestamp ties.
    pub log_position: usize,
}

impl MatchedObservation {
    pub fn timestamp(&self) -> i64 {
        self.observation.timestamp
    }
}

/// Matches for one diagnosis key.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    /// Position of the key in the run's key list.
    pub key_index: usize,
    /// Matched observations, in interval order then log order.
    pub matches: Vec<MatchedObservation>,
    /// Key needed to decrypt the matched observations' metadata.
    pub metadata_key: MetadataKey,
}

impl MatchRecord {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// A key left out of the run, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedKey {
    pub key_index: usize,
    pub reason: KeyError,
}

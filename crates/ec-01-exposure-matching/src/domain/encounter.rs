//! # Encounter Clusterer
//!
//! Groups one key's validated observations into bursts separated by gaps of
//! at least `gap_threshold_secs`, and marks one representative per burst: the
//! first sample, in time order, carrying the burst's minimum attenuation.
//!
//! ```text
//! t:   0   3        18
//!      x   x        x        gap 15 >= 10
//!     [encounter 1] [encounter 2]
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::config::DEFAULT_GAP_THRESHOLD_SECS;
use crate::domain::metadata::ValidatedObservation;

/// A contiguous burst of observations for one key.
///
/// Deserialization rejects an empty burst or an out-of-range representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncounterParts")]
pub struct Encounter {
    samples: Vec<ValidatedObservation>,
    representative: usize,
}

#[derive(Deserialize)]
struct EncounterParts {
    samples: Vec<ValidatedObservation>,
    representative: usize,
}

impl TryFrom<EncounterParts> for Encounter {
    type Error = String;

    fn try_from(parts: EncounterParts) -> Result<Self, Self::Error> {
        if parts.representative >= parts.samples.len() {
            return Err(format!(
                "representative {} out of range for {} samples",
                parts.representative,
                parts.samples.len()
            ));
        }
        Ok(Self {
            samples: parts.samples,
            representative: parts.representative,
        })
    }
}

impl Encounter {
    /// Pick the first minimum-attenuation sample of a time-ordered burst.
    ///
    /// Returns `None` for an empty burst.
    fn from_burst(samples: Vec<ValidatedObservation>) -> Option<Self> {
        let min = samples.iter().map(|s| s.attenuation).min()?;
        let representative = samples.iter().position(|s| s.attenuation == min)?;
        Some(Self {
            samples,
            representative,
        })
    }

    /// The sample chosen to summarize the encounter.
    pub fn representative(&self) -> &ValidatedObservation {
        &self.samples[self.representative]
    }

    /// Position of the representative within `samples()`.
    pub fn representative_index(&self) -> usize {
        self.representative
    }

    /// Every sample except the representative, in time order.
    pub fn others(&self) -> impl Iterator<Item = &ValidatedObservation> {
        let skip = self.representative;
        self.samples
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != skip)
            .map(|(_, s)| s)
    }

    /// All samples, in time order.
    pub fn samples(&self) -> &[ValidatedObservation] {
        &self.samples
    }

    /// Number of samples in the burst.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: encounters hold at least one sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the first sample.
    pub fn start(&self) -> i64 {
        self.samples.first().map_or(0, ValidatedObservation::timestamp)
    }

    /// Timestamp of the last sample.
    pub fn end(&self) -> i64 {
        self.samples.last().map_or(0, ValidatedObservation::timestamp)
    }

    /// Seconds between the first and last sample.
    pub fn duration_secs(&self) -> i64 {
        self.end().saturating_sub(self.start())
    }

    pub fn min_attenuation(&self) -> i32 {
        self.representative().attenuation
    }
}

/// Splits observations into encounters on timestamp gaps.
#[derive(Debug, Clone, Copy)]
pub struct EncounterClusterer {
    gap_threshold_secs: i64,
}

impl Default for EncounterClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_GAP_THRESHOLD_SECS)
    }
}

impl EncounterClusterer {
    pub fn new(gap_threshold_secs: i64) -> Self {
        Self { gap_threshold_secs }
    }

    pub fn gap_threshold_secs(&self) -> i64 {
        self.gap_threshold_secs
    }

    /// Cluster observations into time-ordered, non-overlapping encounters.
    ///
    /// Input is ordered by timestamp, ties by log position. Every input sample
    /// ends up in exactly one encounter.
    pub fn cluster(&self, mut observations: Vec<ValidatedObservation>) -> Vec<Encounter> {
        observations.sort_by_key(|o| (o.timestamp(), o.log_position()));

        let mut encounters = Vec::new();
        let mut burst: Vec<ValidatedObservation> = Vec::new();
        let mut previous: Option<i64> = None;

        for observation in observations {
            if let Some(prev) = previous {
                if observation.timestamp().saturating_sub(prev) >= self.gap_threshold_secs {
                    encounters.extend(Encounter::from_burst(std::mem::take(&mut burst)));
                }
            }
            previous = Some(observation.timestamp());
            burst.push(observation);
        }
        encounters.extend(Encounter::from_burst(burst));

        encounters
    }
}

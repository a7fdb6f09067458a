//! Aggregates over validated matches: per-key summaries, daily match counts
//! and the diagnosis key histogram.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use shared_types::{seconds_of_day, DaySinceEpoch, DiagnosisKey, TimeZoneOffset, STANDARD_ROLLING_PERIOD};

use crate::domain::encounter::Encounter;
use crate::domain::metadata::ValidatedObservation;

/// Detail view of one matched key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub key_index: usize,
    pub observation_count: usize,
    /// Observations whose metadata did not check out.
    pub mismatched_metadata: usize,
    pub encounters: Vec<Encounter>,
    pub min_tx_power: i8,
    pub max_tx_power: i8,
    pub min_attenuation: i32,
    pub first_timestamp: i64,
    pub last_timestamp: i64,
    /// Local seconds since midnight of `first_timestamp`.
    pub first_seconds_of_day: i64,
    /// Local seconds since midnight of `last_timestamp`.
    pub last_seconds_of_day: i64,
    /// Local days with at least one matched observation.
    pub days: BTreeSet<DaySinceEpoch>,
}

impl MatchSummary {
    /// Summarize a key's encounters. `None` when there are none.
    pub fn new(key_index: usize, encounters: Vec<Encounter>, offset: TimeZoneOffset) -> Option<Self> {
        let samples: Vec<&ValidatedObservation> =
            encounters.iter().flat_map(|e| e.samples()).collect();

        let min_tx_power = samples.iter().map(|s| s.tx_power).min()?;
        let max_tx_power = samples.iter().map(|s| s.tx_power).max()?;
        let min_attenuation = samples.iter().map(|s| s.attenuation).min()?;
        let first_timestamp = samples.iter().map(|s| s.timestamp()).min()?;
        let last_timestamp = samples.iter().map(|s| s.timestamp()).max()?;
        let days = samples
            .iter()
            .map(|s| DaySinceEpoch::from_timestamp(s.timestamp(), offset))
            .collect();

        Some(Self {
            key_index,
            observation_count: samples.len(),
            mismatched_metadata: samples.iter().filter(|s| !s.is_valid()).count(),
            min_tx_power,
            max_tx_power,
            min_attenuation,
            first_timestamp,
            last_timestamp,
            first_seconds_of_day: seconds_of_day(first_timestamp, offset),
            last_seconds_of_day: seconds_of_day(last_timestamp, offset),
            days,
            encounters,
        })
    }
}

/// Number of distinct matched keys per local day.
pub fn daily_match_counts<'a>(
    summaries: impl IntoIterator<Item = &'a MatchSummary>,
) -> BTreeMap<DaySinceEpoch, usize> {
    let mut counts = BTreeMap::new();
    for summary in summaries {
        for day in &summary.days {
            *counts.entry(*day).or_insert(0) += 1;
        }
    }
    counts
}

/// Sum of daily counts; a key matched on two days counts twice.
pub fn total_matching_key_count(daily: &BTreeMap<DaySinceEpoch, usize>) -> usize {
    daily.values().sum()
}

/// Diagnosis key counts per day bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyHistogram {
    /// One entry per day from first to last, zeros included.
    pub bins: Vec<(DaySinceEpoch, usize)>,
    /// Keys that fell into some bin.
    pub counted: usize,
}

/// Bin keys by rolling start interval into days `first_day..=last_day`.
///
/// Each key lands in the latest bin starting at or before its start interval;
/// keys starting before `first_day` are not counted.
pub fn diagnosis_key_histogram(
    keys: &[DiagnosisKey],
    first_day: DaySinceEpoch,
    last_day: DaySinceEpoch,
) -> KeyHistogram {
    let mut bins: BTreeMap<u32, usize> = BTreeMap::new();
    let first = first_day.first_interval().0;
    let last = last_day.first_interval().0;
    let mut start = first;
    while start <= last {
        bins.insert(start, 0);
        match start.checked_add(STANDARD_ROLLING_PERIOD) {
            Some(next) => start = next,
            None => break,
        }
    }

    let mut counted = 0;
    for key in keys {
        if let Some((_, count)) = bins.range_mut(..=key.rolling_start_interval.0).next_back() {
            *count += 1;
            counted += 1;
        }
    }

    KeyHistogram {
        bins: bins
            .into_iter()
            .map(|(interval, count)| {
                (DaySinceEpoch(i64::from(interval / STANDARD_ROLLING_PERIOD)), count)
            })
            .collect(),
        counted,
    }
}

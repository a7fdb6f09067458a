//! # Observation Index
//!
//! Read-only index over the local observation log.
//!
//! - identifier -> log positions, for O(1) amortized lookup
//! - local day -> observation count, ordered by day
//!
//! The time zone offset is applied once, at build time. The index is never
//! mutated after construction and is shared across runs behind an `Arc`.

use std::collections::{BTreeMap, HashMap};

use shared_types::{DaySinceEpoch, Observation, RawObservation, RollingProximityId, TimeZoneOffset};

use crate::error::MatchingError;

/// Immutable index over an observation log.
#[derive(Debug, Clone, Default)]
pub struct ObservationIndex {
    observations: Vec<Observation>,
    by_identifier: HashMap<RollingProximityId, Vec<usize>>,
    day_counts: BTreeMap<DaySinceEpoch, usize>,
    time_zone_offset: TimeZoneOffset,
}

impl ObservationIndex {
    /// Index `observations`, keeping their log order as positions.
    pub fn build(observations: Vec<Observation>, time_zone_offset: TimeZoneOffset) -> Self {
        let mut by_identifier: HashMap<RollingProximityId, Vec<usize>> = HashMap::new();
        let mut day_counts = BTreeMap::new();

        for (position, observation) in observations.iter().enumerate() {
            by_identifier.entry(observation.rpi).or_default().push(position);
            let day = DaySinceEpoch::from_timestamp(observation.timestamp, time_zone_offset);
            *day_counts.entry(day).or_insert(0) += 1;
        }

        Self {
            observations,
            by_identifier,
            day_counts,
            time_zone_offset,
        }
    }

    /// Index a provider's raw records.
    ///
    /// # Errors
    ///
    /// `MatchingError::CorruptObservation` for the first record with a field
    /// of the wrong length; the whole log is rejected.
    pub fn try_build(raw: &[RawObservation], time_zone_offset: TimeZoneOffset) -> Result<Self, MatchingError> {
        let observations = raw
            .iter()
            .enumerate()
            .map(|(position, record)| {
                Observation::try_from(record).map_err(|e| MatchingError::CorruptObservation {
                    position,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::build(observations, time_zone_offset))
    }

    /// An index with no observations.
    pub fn empty(time_zone_offset: TimeZoneOffset) -> Self {
        Self::build(Vec::new(), time_zone_offset)
    }

    /// Observations bearing `rpi`, with their log positions, in log order.
    pub fn lookup<'a>(
        &'a self,
        rpi: &RollingProximityId,
    ) -> impl Iterator<Item = (usize, &'a Observation)> + 'a {
        let positions = self.by_identifier.get(rpi).map(Vec::as_slice).unwrap_or(&[]);
        positions
            .iter()
            .filter_map(move |&position| self.observations.get(position).map(|o| (position, o)))
    }

    /// Whether any observation bears `rpi`.
    pub fn contains(&self, rpi: &RollingProximityId) -> bool {
        self.by_identifier.contains_key(rpi)
    }

    /// Observation at a log position.
    pub fn get(&self, position: usize) -> Option<&Observation> {
        self.observations.get(position)
    }

    /// Local days with at least one observation, ascending.
    pub fn days_present(&self) -> impl Iterator<Item = DaySinceEpoch> + '_ {
        self.day_counts.keys().copied()
    }

    /// Number of observations on a local day.
    pub fn count_for_day(&self, day: DaySinceEpoch) -> usize {
        self.day_counts.get(&day).copied().unwrap_or(0)
    }

    /// Per-day counts for the `days` days ending with `last_day`, zeros included.
    pub fn day_counts_window(&self, last_day: DaySinceEpoch, days: u32) -> Vec<(DaySinceEpoch, usize)> {
        (0..i64::from(days))
            .rev()
            .map(|back| {
                let day = last_day.minus_days(back);
                (day, self.count_for_day(day))
            })
            .collect()
    }

    /// Earliest local day present.
    pub fn first_day(&self) -> Option<DaySinceEpoch> {
        self.day_counts.keys().next().copied()
    }

    /// Latest local day present.
    pub fn last_day(&self) -> Option<DaySinceEpoch> {
        self.day_counts.keys().next_back().copied()
    }

    /// Total number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when the log held no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of distinct identifiers.
    pub fn distinct_identifiers(&self) -> usize {
        self.by_identifier.len()
    }

    /// Offset used for day bucketing.
    pub fn time_zone_offset(&self) -> TimeZoneOffset {
        self.time_zone_offset
    }
}

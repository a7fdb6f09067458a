//! Result of one matching run.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use shared_types::{DaySinceEpoch, DiagnosisKey};

use crate::domain::records::{MatchRecord, SkippedKey};
use crate::domain::summary::{daily_match_counts, total_matching_key_count, MatchSummary};

/// User-facing reduction of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStatus {
    /// No observations were available to match against.
    NotPossible,
    NoMatches,
    /// Total matching-key count over all days.
    Matches(usize),
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// Keys of the run, shared with the caller.
    pub keys: Arc<[DiagnosisKey]>,
    /// One record per processed key (empty ones only if configured).
    pub records: Vec<MatchRecord>,
    /// Summaries of keys with at least one match, in key order.
    pub summaries: Vec<MatchSummary>,
    pub skipped: Vec<SkippedKey>,
    /// Cancelled before every key was processed.
    pub partial: bool,
    /// False when the observation log was empty.
    pub matching_possible: bool,
}

impl MatchReport {
    /// Report for a run that had nothing to match against.
    pub fn not_possible(keys: Arc<[DiagnosisKey]>) -> Self {
        Self {
            keys,
            records: Vec::new(),
            summaries: Vec::new(),
            skipped: Vec::new(),
            partial: false,
            matching_possible: false,
        }
    }

    pub fn daily_match_counts(&self) -> BTreeMap<DaySinceEpoch, usize> {
        daily_match_counts(&self.summaries)
    }

    pub fn total_matching_key_count(&self) -> usize {
        total_matching_key_count(&self.daily_match_counts())
    }

    pub fn matched_key_count(&self) -> usize {
        self.summaries.len()
    }

    /// Key a record or summary refers to.
    pub fn key(&self, key_index: usize) -> Option<&DiagnosisKey> {
        self.keys.get(key_index)
    }

    pub fn summary_for(&self, key_index: usize) -> Option<&MatchSummary> {
        self.summaries.iter().find(|s| s.key_index == key_index)
    }

    pub fn status(&self) -> MatchStatus {
        if !self.matching_possible {
            return MatchStatus::NotPossible;
        }
        match self.total_matching_key_count() {
            0 => MatchStatus::NoMatches,
            n => MatchStatus::Matches(n),
        }
    }
}

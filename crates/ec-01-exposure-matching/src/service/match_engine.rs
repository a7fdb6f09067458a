//! Match Engine
//!
//! Expands every diagnosis key and looks its identifiers up in the
//! observation index. Keys are processed in input order; cancellation is
//! checked after each complete key, never inside one.

use std::collections::HashSet;
use std::sync::Arc;

use ec_telemetry::log_key_event;
use shared_types::DiagnosisKey;
use tracing::debug;

use crate::domain::{KeyExpander, MatchRecord, MatchedObservation, ObservationIndex, SkippedKey};
use crate::error::{KeyError, MatchingError};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::worker::CancellationToken;
use crate::SUBSYSTEM;

/// Raw output of the engine, before metadata validation.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// One record per processed, well-formed key, in key order.
    pub records: Vec<MatchRecord>,
    pub skipped: Vec<SkippedKey>,
    /// Keys processed before stopping.
    pub processed: usize,
    /// Stopped by cancellation before the last key.
    pub partial: bool,
}

/// Orchestrates key expansion and index lookup across all keys.
pub struct MatchEngine {
    metrics: Arc<dyn MetricsRecorder>,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(NoOpMetrics),
        }
    }

    pub fn with_metrics(metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self { metrics }
    }

    /// Match `keys` against `index`.
    ///
    /// `on_progress(processed, total)` is called after each key.
    pub fn run(
        &self,
        keys: &[DiagnosisKey],
        index: &ObservationIndex,
        token: &CancellationToken,
        mut on_progress: impl FnMut(usize, usize),
    ) -> MatchOutcome {
        let total = keys.len();
        let mut outcome = MatchOutcome::default();

        for (key_index, key) in keys.iter().enumerate() {
            match self.match_key(key_index, key, index) {
                Ok(record) => outcome.records.push(record),
                Err(reason) => {
                    log_key_event!(
                        warn,
                        SUBSYSTEM,
                        "Skipping diagnosis key",
                        key_index,
                        error = %MatchingError::for_key(key_index, reason.clone())
                    );
                    self.metrics.record_key_skipped();
                    outcome.skipped.push(SkippedKey { key_index, reason });
                }
            }

            outcome.processed = key_index + 1;
            on_progress(outcome.processed, total);

            if token.is_cancelled() && outcome.processed < total {
                debug!(processed = outcome.processed, total, "[ec-01] Run cancelled");
                outcome.partial = true;
                break;
            }
        }

        outcome
    }

    /// Expand one key and collect its sightings.
    pub fn match_key(
        &self,
        key_index: usize,
        key: &DiagnosisKey,
        index: &ObservationIndex,
    ) -> Result<MatchRecord, KeyError> {
        let expander = KeyExpander::new(key)?;

        let mut queried = HashSet::with_capacity(expander.len());
        let mut matches = Vec::new();
        let mut identifiers = 0;

        for (interval, rpi) in expander.identifiers() {
            identifiers += 1;
            if !queried.insert(rpi) {
                continue;
            }
            matches.extend(index.lookup(&rpi).map(|(log_position, observation)| {
                MatchedObservation {
                    observation: *observation,
                    interval,
                    log_position,
                }
            }));
        }

        self.metrics
            .record_key_processed(identifiers, queried.len(), matches.len());
        debug!(
            key_index,
            identifiers,
            matched = matches.len(),
            "[ec-01] Key processed"
        );

        Ok(MatchRecord {
            key_index,
            matches,
            metadata_key: expander.into_metadata_key(),
        })
    }
}

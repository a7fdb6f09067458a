//! Match Pipeline
//!
//! One matching run end to end, synchronous and free of I/O:
//!
//! ```text
//! keys + index -> MatchEngine -> MetadataValidator -> EncounterClusterer -> MatchReport
//! ```
//!
//! Runs on the worker's blocking thread.

use std::sync::Arc;
use std::time::Instant;

use shared_types::DiagnosisKey;
use tracing::info;

use crate::domain::{
    EncounterClusterer, MatchReport, MatchSummary, MatchingConfig, MetadataValidator, ObservationIndex,
};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::service::match_engine::MatchEngine;
use crate::worker::CancellationToken;

/// Configured chain of matching stages.
pub struct MatchPipeline {
    config: MatchingConfig,
    engine: MatchEngine,
    validator: MetadataValidator,
    clusterer: EncounterClusterer,
    metrics: Arc<dyn MetricsRecorder>,
}

impl MatchPipeline {
    pub fn new(config: MatchingConfig) -> Self {
        Self::with_metrics(config, Arc::new(NoOpMetrics))
    }

    pub fn with_metrics(config: MatchingConfig, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self {
            engine: MatchEngine::with_metrics(Arc::clone(&metrics)),
            validator: MetadataValidator::new(config.metadata_layout),
            clusterer: EncounterClusterer::new(config.gap_threshold_secs),
            config,
            metrics,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Run every stage and assemble the report.
    pub fn execute(
        &self,
        keys: Arc<[DiagnosisKey]>,
        index: &ObservationIndex,
        token: &CancellationToken,
        on_progress: impl FnMut(usize, usize),
    ) -> MatchReport {
        let started = Instant::now();
        let outcome = self.engine.run(&keys, index, token, on_progress);

        let mut summaries = Vec::new();
        let mut mismatches = 0;
        for record in &outcome.records {
            if record.is_empty() {
                continue;
            }
            let validated = self.validator.validate(record);
            mismatches += validated.iter().filter(|v| !v.is_valid()).count();
            let encounters = self.clusterer.cluster(validated);
            // Days follow the offset the index was built with.
            summaries.extend(MatchSummary::new(
                record.key_index,
                encounters,
                index.time_zone_offset(),
            ));
        }
        self.metrics.record_metadata_mismatches(mismatches);

        let records = if self.config.keep_empty_records {
            outcome.records
        } else {
            outcome.records.into_iter().filter(|r| !r.is_empty()).collect()
        };

        let report = MatchReport {
            keys,
            records,
            summaries,
            skipped: outcome.skipped,
            partial: outcome.partial,
            matching_possible: !index.is_empty(),
        };

        let elapsed = started.elapsed();
        self.metrics.record_run_finished(elapsed, report.partial);
        info!(
            processed = outcome.processed,
            matched_keys = report.matched_key_count(),
            skipped = report.skipped.len(),
            partial = report.partial,
            elapsed_ms = elapsed.as_millis() as u64,
            "[ec-01] Matching run finished"
        );

        report
    }
}

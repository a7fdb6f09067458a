//! Metrics and tracing hooks for matching runs
//!
//! Provides instrumentation points for monitoring key expansion, index
//! lookups and run outcomes.
//!
//! ## Usage
//!
//! ```ignore
//! use ec_01_exposure_matching::metrics::{Metrics, MetricsRecorder};
//!
//! let metrics = Arc::new(Metrics::new());
//! let engine = MatchEngine::with_metrics(metrics.clone());
//! // ... run ...
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for matching runs
///
/// Thread-safe counters for monitoring matching throughput.
#[derive(Default, Debug)]
pub struct Metrics {
    /// Diagnosis keys expanded and looked up
    pub keys_processed: AtomicU64,
    /// Diagnosis keys skipped (malformed or invalid window)
    pub keys_skipped: AtomicU64,
    /// Rolling identifiers derived
    pub identifiers_derived: AtomicU64,
    /// Index lookups performed
    pub lookups_performed: AtomicU64,
    /// Observations matched to some key
    pub observations_matched: AtomicU64,
    /// Matched observations with unexpected metadata
    pub metadata_mismatches: AtomicU64,
    /// Runs that processed every key
    pub runs_completed: AtomicU64,
    /// Runs stopped early by cancellation
    pub runs_cancelled: AtomicU64,
    /// Cumulative run time in nanoseconds
    pub run_time_ns: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one key's expansion and lookups
    ///
    /// # Arguments
    /// * `identifiers` - Identifiers derived for the key
    /// * `lookups` - Index lookups issued
    /// * `matched` - Observations matched
    pub fn record_key_processed(&self, identifiers: usize, lookups: usize, matched: usize) {
        self.keys_processed.fetch_add(1, Ordering::Relaxed);
        self.identifiers_derived.fetch_add(identifiers as u64, Ordering::Relaxed);
        self.lookups_performed.fetch_add(lookups as u64, Ordering::Relaxed);
        self.observations_matched.fetch_add(matched as u64, Ordering::Relaxed);
    }

    /// Record a skipped key
    pub fn record_key_skipped(&self) {
        self.keys_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record metadata mismatches found while validating
    pub fn record_metadata_mismatches(&self, count: usize) {
        self.metadata_mismatches.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record the end of a run
    pub fn record_run_finished(&self, duration: Duration, partial: bool) {
        if partial {
            self.runs_cancelled.fetch_add(1, Ordering::Relaxed);
        } else {
            self.runs_completed.fetch_add(1, Ordering::Relaxed);
        }
        self.run_time_ns.fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            keys_processed: self.keys_processed.load(Ordering::Relaxed),
            keys_skipped: self.keys_skipped.load(Ordering::Relaxed),
            identifiers_derived: self.identifiers_derived.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            observations_matched: self.observations_matched.load(Ordering::Relaxed),
            metadata_mismatches: self.metadata_mismatches.load(Ordering::Relaxed),
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            runs_cancelled: self.runs_cancelled.load(Ordering::Relaxed),
            avg_run_ns: self.avg_run_time_ns(),
        }
    }

    /// Calculate average run time in nanoseconds
    pub fn avg_run_time_ns(&self) -> u64 {
        let total = self.run_time_ns.load(Ordering::Relaxed);
        let runs = self.runs_completed.load(Ordering::Relaxed)
            + self.runs_cancelled.load(Ordering::Relaxed);
        if runs > 0 {
            total / runs
        } else {
            0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.keys_processed.store(0, Ordering::Relaxed);
        self.keys_skipped.store(0, Ordering::Relaxed);
        self.identifiers_derived.store(0, Ordering::Relaxed);
        self.lookups_performed.store(0, Ordering::Relaxed);
        self.observations_matched.store(0, Ordering::Relaxed);
        self.metadata_mismatches.store(0, Ordering::Relaxed);
        self.runs_completed.store(0, Ordering::Relaxed);
        self.runs_cancelled.store(0, Ordering::Relaxed);
        self.run_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub keys_processed: u64,
    pub keys_skipped: u64,
    pub identifiers_derived: u64,
    pub lookups_performed: u64,
    pub observations_matched: u64,
    pub metadata_mismatches: u64,
    pub runs_completed: u64,
    pub runs_cancelled: u64,
    pub avg_run_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    /// Record one key's expansion and lookups
    fn record_key_processed(&self, identifiers: usize, lookups: usize, matched: usize);

    /// Record a skipped key
    fn record_key_skipped(&self);

    /// Record metadata mismatches
    fn record_metadata_mismatches(&self, count: usize);

    /// Record the end of a run
    fn record_run_finished(&self, duration: Duration, partial: bool);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_key_processed(&self, _: usize, _: usize, _: usize) {}
    fn record_key_skipped(&self) {}
    fn record_metadata_mismatches(&self, _: usize) {}
    fn record_run_finished(&self, _: Duration, _: bool) {}
}

impl MetricsRecorder for Metrics {
    fn record_key_processed(&self, identifiers: usize, lookups: usize, matched: usize) {
        Metrics::record_key_processed(self, identifiers, lookups, matched);
    }

    fn record_key_skipped(&self) {
        Metrics::record_key_skipped(self);
    }

    fn record_metadata_mismatches(&self, count: usize) {
        Metrics::record_metadata_mismatches(self, count);
    }

    fn record_run_finished(&self, duration: Duration, partial: bool) {
        Metrics::record_run_finished(self, duration, partial);
    }
}

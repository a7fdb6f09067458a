//! # Run Concurrency
//!
//! The worker's contract with its owner: one run at a time, progress events
//! in order, a single terminal event, cancellation honored between keys.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use ec_01_exposure_matching::{
        ExposureMatchingService, InMemoryKeyProvider, InMemoryObservationLog, MatchEvent,
        MatchingApi, MatchingError, ObservationIndex, ObservationLogProvider, ProviderError,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared_types::{DiagnosisKey, Observation, RawObservation, TimeZoneOffset};
    use tokio::sync::{Notify, Semaphore};

    use crate::fixtures::{background_noise, random_key, Broadcaster};

    fn keys(count: u32) -> Vec<DiagnosisKey> {
        let mut rng = StdRng::seed_from_u64(count as u64);
        (0..count)
            .map(|i| random_key(&mut rng, 2_700_000 + (i % 14) * 144))
            .collect()
    }

    fn observations(keys: &[DiagnosisKey]) -> Vec<Observation> {
        let mut rng = StdRng::seed_from_u64(99);
        let mut observations = background_noise(&mut rng, 50, 2_700_000 * 600);
        observations.push(Broadcaster::new(&keys[0]).plain_sighting(2_700_010, 0, -60));
        observations
    }

    fn service(
        keys: Vec<DiagnosisKey>,
    ) -> ExposureMatchingService<InMemoryObservationLog, InMemoryKeyProvider> {
        ExposureMatchingService::new(
            Arc::new(InMemoryObservationLog::from_observations(&observations(&keys))),
            Arc::new(InMemoryKeyProvider::new(keys)),
        )
    }

    /// Observation log that holds every load until the gate is opened.
    struct GatedObservationLog {
        inner: InMemoryObservationLog,
        entered: Notify,
        gate: Semaphore,
    }

    impl GatedObservationLog {
        fn new(observations: &[Observation]) -> Self {
            Self {
                inner: InMemoryObservationLog::from_observations(observations),
                entered: Notify::new(),
                gate: Semaphore::new(0),
            }
        }

        fn open(&self) {
            self.gate.add_permits(1);
        }
    }

    #[async_trait]
    impl ObservationLogProvider for GatedObservationLog {
        async fn observations(&self) -> Result<Vec<RawObservation>, ProviderError> {
            self.entered.notify_one();
            let _pass = self
                .gate
                .acquire()
                .await
                .map_err(|_| ProviderError::Unavailable("gate closed".into()))?;
            self.inner.observations().await
        }
    }

    async fn drain(handle: &mut ec_01_exposure_matching::RunHandle) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        while let Some(event) = handle.next_event().await {
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn test_second_run_rejected_while_first_in_flight() {
        let keys = keys(20);
        let log = Arc::new(GatedObservationLog::new(&observations(&keys)));
        let svc = Arc::new(ExposureMatchingService::new(
            log.clone(),
            Arc::new(InMemoryKeyProvider::new(keys)),
        ));

        // The first start holds the slot while its load is parked on the gate.
        let first = tokio::spawn({
            let svc = svc.clone();
            async move { svc.start_run().await }
        });
        log.entered.notified().await;
        assert!(svc.is_running());

        let second = svc.start_run().await;
        assert!(matches!(second, Err(MatchingError::RunInProgress)));

        log.open();
        let report = first.await.unwrap().unwrap().join().await.unwrap();
        assert_eq!(report.records.len(), 20);
        assert_eq!(report.matched_key_count(), 1);

        assert!(!svc.is_running());
        let third = svc.start_run().await.unwrap();
        assert!(third.join().await.is_ok());
    }

    #[tokio::test]
    async fn test_rejected_start_does_not_disturb_running_run() {
        let svc = service(keys(50));
        let mut run = svc.start_run().await.unwrap();
        let _ = svc.start_run().await;

        let events = drain(&mut run).await;
        assert_eq!(events.last(), Some(&MatchEvent::Completed { partial: false }));

        let report = run.join().await.unwrap();
        assert_eq!(report.records.len(), 50);
        assert_eq!(report.matched_key_count(), 1);
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_ends_with_completion() {
        let svc = service(keys(40));
        let mut run = svc.start_run().await.unwrap();
        let events = drain(&mut run).await;

        let progress: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                MatchEvent::Progress { processed, total } => {
                    assert_eq!(*total, 40);
                    Some(*processed)
                }
                _ => None,
            })
            .collect();
        assert_eq!(progress, (1..=40).collect::<Vec<_>>());
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        assert!(events.last().unwrap().is_terminal());

        run.join().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_yields_partial_report() {
        let svc = service(keys(2_000));
        let mut run = svc.start_run().await.unwrap();
        run.cancel();

        let events = drain(&mut run).await;
        let report = run.join().await.unwrap();

        assert!(report.partial);
        assert_eq!(events.last(), Some(&MatchEvent::Completed { partial: true }));
        let processed = report.records.len() + report.skipped.len();
        assert!(processed >= 1 && processed < 2_000);
        // Every processed key is whole: records are a prefix of the input.
        for (position, record) in report.records.iter().enumerate() {
            assert_eq!(record.key_index, position);
        }
    }

    #[tokio::test]
    async fn test_slot_free_once_completed_seen() {
        let svc = service(keys(10));
        let mut run = svc.start_run().await.unwrap();
        drain(&mut run).await;

        // Completed is sent after the slot is released.
        assert!(!svc.is_running());
        let next = svc
            .start_run_with(
                Arc::from(keys(1)),
                Arc::new(ObservationIndex::empty(TimeZoneOffset::UTC)),
            )
            .unwrap();
        next.join().await.unwrap();
        run.join().await.unwrap();
    }

    #[tokio::test]
    async fn test_metrics_accumulate_across_runs() {
        let svc = service(keys(5));
        svc.start_run().await.unwrap().join().await.unwrap();
        svc.start_run().await.unwrap().join().await.unwrap();

        let snapshot = svc.metrics().snapshot();
        assert_eq!(snapshot.runs_completed, 2);
        assert_eq!(snapshot.keys_processed, 10);
        assert_eq!(snapshot.observations_matched, 2);
    }
}

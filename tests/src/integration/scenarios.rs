//! # Matching Scenarios
//!
//! End-to-end runs through `ExposureMatchingService` and the pipeline:
//!
//! 1. **Single match**: one key, one sighting
//! 2. **Empty log**: every key gets an empty record, nothing fails
//! 3. **Gap clustering**: 3 s apart, then 15 s gap
//! 4. **Corrupt metadata**: flagged, run continues
//! 5. **Order independence**: same result for shuffled keys

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ec_01_exposure_matching::{
        CancellationToken, EncounterClusterer, ExposureMatchingService, InMemoryKeyProvider,
        InMemoryObservationLog, MatchEngine, MatchPipeline, MatchStatus, MatchingApi,
        MatchingConfig, MetadataStatus, MetadataValidator, ObservationIndex,
    };
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use shared_types::{DiagnosisKey, IntervalNumber, TimeZoneOffset};

    use crate::fixtures::{background_noise, key, random_key, Broadcaster};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn service(
        observations: Vec<shared_types::Observation>,
        keys: Vec<DiagnosisKey>,
    ) -> ExposureMatchingService<InMemoryObservationLog, InMemoryKeyProvider> {
        ExposureMatchingService::new(
            Arc::new(InMemoryObservationLog::from_observations(&observations)),
            Arc::new(InMemoryKeyProvider::new(keys)),
        )
    }

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    #[test]
    fn test_single_key_single_sighting() {
        let k = key(0x11, 1000);
        let index = ObservationIndex::build(
            vec![Broadcaster::new(&k).plain_sighting(1050, 42, -70)],
            TimeZoneOffset::UTC,
        );

        let outcome = MatchEngine::new().run(&[k], &index, &CancellationToken::new(), |_, _| {});

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].matches.len(), 1);
        assert_eq!(outcome.records[0].matches[0].interval, IntervalNumber(1050));
    }

    #[tokio::test]
    async fn test_empty_log_gives_empty_records_without_error() {
        let keys = vec![key(1, 1000), key(2, 1144), key(3, 1288)];
        let report = service(Vec::new(), keys)
            .start_run()
            .await
            .unwrap()
            .join()
            .await
            .unwrap();

        assert_eq!(report.records.len(), 3);
        assert!(report.records.iter().all(|r| r.matches.is_empty()));
        assert!(report.skipped.is_empty());
        assert!(!report.matching_possible);
        assert_eq!(report.status(), MatchStatus::NotPossible);
    }

    #[test]
    fn test_burst_then_gap_gives_two_encounters() {
        let k = key(0x22, 2000);
        let b = Broadcaster::new(&k);
        let observations = vec![
            b.plain_sighting(2010, 100, -70),
            b.plain_sighting(2010, 103, -72),
            b.plain_sighting(2010, 118, -68),
        ];
        let index = ObservationIndex::build(observations, TimeZoneOffset::UTC);
        let outcome = MatchEngine::new().run(&[k], &index, &CancellationToken::new(), |_, _| {});

        let validated = MetadataValidator::default().validate(&outcome.records[0]);
        let encounters = EncounterClusterer::new(10).cluster(validated);

        assert_eq!(encounters.len(), 2);
        assert_eq!(encounters[0].len(), 2);
        assert_eq!(encounters[1].len(), 1);
    }

    #[test]
    fn test_corrupt_metadata_flagged_and_kept() {
        let k = key(0x33, 3000);
        let b = Broadcaster::new(&k);
        let observations = vec![
            b.sighting(3001, 0, -60, [0x00, 0xF8, 0, 0]),
            b.plain_sighting(3001, 2, -61),
        ];
        let index = ObservationIndex::build(observations, TimeZoneOffset::UTC);
        let keys: Arc<[DiagnosisKey]> = Arc::from(vec![k]);

        let report = MatchPipeline::new(MatchingConfig::default()).execute(
            keys,
            &index,
            &CancellationToken::new(),
            |_, _| {},
        );

        let summary = &report.summaries[0];
        assert_eq!(summary.observation_count, 2);
        assert_eq!(summary.mismatched_metadata, 1);
        let first = &summary.encounters[0].samples()[0];
        assert_eq!(
            first.status,
            MetadataStatus::Mismatch {
                decrypted: [0x00, 0xF8, 0, 0]
            }
        );
        assert_eq!(report.status(), MatchStatus::Matches(1));
    }

    #[test]
    fn test_result_independent_of_key_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let keys: Vec<DiagnosisKey> = (0..20)
            .map(|i| random_key(&mut rng, 5000 + i * 144))
            .collect();

        let mut observations = background_noise(&mut rng, 200, 5000 * 600);
        for (i, k) in keys.iter().enumerate().step_by(3) {
            let b = Broadcaster::new(k);
            let start = k.rolling_start_interval.0;
            observations.push(b.plain_sighting(start + 10, 0, -65));
            observations.push(b.plain_sighting(start + 10, 4, -60 - i as i16));
        }
        let index = ObservationIndex::build(observations, TimeZoneOffset::UTC);

        let collect = |keys: &[DiagnosisKey]| {
            let outcome = MatchEngine::new().run(keys, &index, &CancellationToken::new(), |_, _| {});
            let mut matched: Vec<(Vec<u8>, Vec<usize>)> = outcome
                .records
                .iter()
                .map(|r| {
                    (
                        keys[r.key_index].key_data.clone(),
                        r.matches.iter().map(|m| m.log_position).collect(),
                    )
                })
                .collect();
            matched.sort();
            matched
        };

        let mut shuffled = keys.clone();
        shuffled.shuffle(&mut rng);

        let forward = collect(&keys[..]);
        assert_eq!(forward, collect(&shuffled[..]));
        assert_eq!(forward.iter().filter(|(_, m)| !m.is_empty()).count(), 7);
    }

    #[test]
    fn test_malformed_key_reported_as_skipped() {
        let good = key(0x44, 4000);
        let index = ObservationIndex::build(
            vec![Broadcaster::new(&good).plain_sighting(4000, 0, -60)],
            TimeZoneOffset::UTC,
        );
        let keys: Arc<[DiagnosisKey]> =
            Arc::from(vec![DiagnosisKey::new(vec![0u8; 8], 4000, 144), good]);

        let report = MatchPipeline::new(MatchingConfig::default()).execute(
            keys,
            &index,
            &CancellationToken::new(),
            |_, _| {},
        );

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].key_index, 0);
        assert_eq!(report.summaries.len(), 1);
        assert_eq!(report.summaries[0].key_index, 1);
    }

    #[tokio::test]
    async fn test_local_day_aggregates() {
        let k = key(0x55, 2_700_000);
        let b = Broadcaster::new(&k);
        // 2_700_000 * 600 s is 18750 days after the epoch, at midnight UTC.
        let observations = vec![
            b.plain_sighting(2_700_000 + 141, 0, -60), // 23:30 UTC
            b.plain_sighting(2_700_000 + 143, 0, -60), // 23:50 UTC
        ];
        let config = MatchingConfig::default().with_time_zone_offset(TimeZoneOffset(3600));
        let svc = ExposureMatchingService::with_config(
            Arc::new(InMemoryObservationLog::from_observations(&observations)),
            Arc::new(InMemoryKeyProvider::new(vec![k])),
            config,
        )
        .unwrap();

        let report = svc.start_run().await.unwrap().join().await.unwrap();
        let daily = report.daily_match_counts();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily.keys().next().map(|d| d.0), Some(18_751));
        assert_eq!(report.total_matching_key_count(), 1);

        let summary = &report.summaries[0];
        assert_eq!(summary.first_seconds_of_day, 1800);
        assert_eq!(summary.last_seconds_of_day, 3000);
        assert_eq!(summary.encounters.len(), 2);
    }
}

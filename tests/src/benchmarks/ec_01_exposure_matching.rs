//! # EC-01 Exposure Matching Benchmarks
//!
//! Targets:
//! - Key expansion (HKDF + 144 AES blocks): < 50μs per key
//! - Index lookup: O(1) per identifier regardless of log size
//! - Full run: 14 days of keys against a day's worth of sightings
//!
//! Load:
//! - Up to 10,000 published keys
//! - 100,000 logged observations, almost all unrelated

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use ec_01_exposure_matching::{
    CancellationToken, EncounterClusterer, KeyExpander, MatchEngine, MatchPipeline, MatchingConfig,
    MetadataValidator, ObservationIndex,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared_types::{DiagnosisKey, Observation, TimeZoneOffset};

use crate::fixtures::{background_noise, random_key, Broadcaster};

const FIRST_INTERVAL: u32 = 2_700_000;

fn published_keys(rng: &mut StdRng, count: usize) -> Vec<DiagnosisKey> {
    (0..count)
        .map(|i| random_key(rng, FIRST_INTERVAL + (i as u32 % 14) * 144))
        .collect()
}

/// Noise plus ten sightings of every hundredth key.
fn observation_log(rng: &mut StdRng, keys: &[DiagnosisKey], noise: usize) -> Vec<Observation> {
    let mut observations = background_noise(rng, noise, i64::from(FIRST_INTERVAL) * 600);
    for key in keys.iter().step_by(100) {
        let broadcaster = Broadcaster::new(key);
        let start = key.rolling_start_interval.0;
        observations.extend((0..10).map(|i| broadcaster.plain_sighting(start + 30, i * 4, -65)));
    }
    observations
}

pub fn bench_key_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ec-01/key_expansion");
    group.measurement_time(Duration::from_secs(10));

    let mut rng = StdRng::seed_from_u64(1);
    let key = random_key(&mut rng, FIRST_INTERVAL);

    group.bench_function("expand_single_key", |b| {
        b.iter(|| {
            let expander = KeyExpander::new(black_box(&key)).unwrap();
            black_box(expander.identifiers().count())
        })
    });

    group.finish();
}

pub fn bench_index_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("ec-01/index_lookup");

    for size in [1_000usize, 10_000, 100_000] {
        let mut rng = StdRng::seed_from_u64(size as u64);
        let keys = published_keys(&mut rng, 1);
        let index = ObservationIndex::build(observation_log(&mut rng, &keys, size), TimeZoneOffset::UTC);
        let expander = KeyExpander::new(&keys[0]).unwrap();
        let ids: Vec<_> = expander.identifiers().map(|(_, rpi)| rpi).collect();

        group.throughput(Throughput::Elements(ids.len() as u64));
        group.bench_with_input(BenchmarkId::new("lookup_144_ids", size), &ids, |b, ids| {
            b.iter(|| ids.iter().map(|rpi| index.lookup(rpi).count()).sum::<usize>())
        });
    }

    group.finish();
}

pub fn bench_matching_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("ec-01/matching_run");
    group.measurement_time(Duration::from_secs(15));
    group.sample_size(10);

    for key_count in [1_000usize, 10_000] {
        let mut rng = StdRng::seed_from_u64(key_count as u64);
        let keys = published_keys(&mut rng, key_count);
        let index = ObservationIndex::build(observation_log(&mut rng, &keys, 100_000), TimeZoneOffset::UTC);
        let engine = MatchEngine::new();
        let token = CancellationToken::new();

        group.throughput(Throughput::Elements(key_count as u64));
        group.bench_with_input(BenchmarkId::new("engine", key_count), &keys, |b, keys| {
            b.iter(|| black_box(engine.run(keys, &index, &token, |_, _| {}).records.len()))
        });

        let pipeline = MatchPipeline::new(MatchingConfig::default());
        let shared: Arc<[DiagnosisKey]> = Arc::from(keys);
        group.bench_with_input(BenchmarkId::new("pipeline", key_count), &shared, |b, keys| {
            b.iter(|| {
                black_box(
                    pipeline
                        .execute(Arc::clone(keys), &index, &token, |_, _| {})
                        .summaries
                        .len(),
                )
            })
        });
    }

    group.finish();
}

pub fn bench_validate_and_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("ec-01/validate_and_cluster");

    let mut rng = StdRng::seed_from_u64(3);
    let key = random_key(&mut rng, FIRST_INTERVAL);
    let broadcaster = Broadcaster::new(&key);
    // One sighting every 3 s for an hour, with a 15 s pause every minute.
    let observations: Vec<_> = (0..1_200i64)
        .map(|i| {
            let offset = i * 3 + (i / 20) * 15;
            broadcaster.plain_sighting(FIRST_INTERVAL + (offset / 600) as u32, offset % 600, -60)
        })
        .collect();
    let index = ObservationIndex::build(observations, TimeZoneOffset::UTC);
    let record = MatchEngine::new()
        .match_key(0, &key, &index)
        .unwrap();
    let validator = MetadataValidator::default();
    let clusterer = EncounterClusterer::default();

    group.throughput(Throughput::Elements(record.len() as u64));
    group.bench_function("validate_1200", |b| {
        b.iter(|| black_box(validator.validate(&record).len()))
    });
    group.bench_function("validate_and_cluster_1200", |b| {
        b.iter(|| black_box(clusterer.cluster(validator.validate(&record)).len()))
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_key_expansion(c);
    bench_index_lookup(c);
    bench_matching_run(c);
    bench_validate_and_cluster(c);
}

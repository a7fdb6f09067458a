//! # Exposure Matching Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | ec-01 | Key expansion | < 50μs per key |
//! | ec-01 | Full run, 10k keys | < 2s |

use criterion::{criterion_group, criterion_main, Criterion};
use ec_tests::benchmarks::ec_01_exposure_matching;

fn bench_exposure_matching(c: &mut Criterion) {
    ec_01_exposure_matching::register_benchmarks(c);
}

criterion_group!(benches, bench_exposure_matching);

criterion_main!(benches);

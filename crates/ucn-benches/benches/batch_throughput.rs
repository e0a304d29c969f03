// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
// criterion_group!/criterion_main! expand to undocumented functions that cannot
// carry #[allow] (attributes on macro invocations are ignored). Crate-level
// suppress is required for benchmark binaries using Criterion.
#![allow(missing_docs)]
//! Whole-particle propagation on the demo storage bottle.
//!
//! # Running
//!
//! ```sh
//! cargo bench --package ucn-benches --bench batch_throughput
//! ```
//!
//! # What This Measures
//!
//! - `single_particle`: one seeded history, no observers
//! - `worker_scaling_256`: `run_batch` with 1, 2, 4 and 8 workers
//! - `rayon_baseline_256`: the same histories through `par_iter`, for comparing
//!   the chunked work claiming against a work-stealing pool
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rayon::prelude::*;
use ucn_core::{propagate, NullObserver};
use ucn_run::{demo, particle_seed, run_batch, RunConfig};

const BATCH: u64 = 256;

fn config() -> RunConfig {
    let mut config = RunConfig { particles: BATCH, seed: 0xbe7c, ..RunConfig::default() };
    // Keep histories short enough for criterion's sample count.
    config.propagation.clock.run_end = 20.0;
    config
}

fn bench_single(c: &mut Criterion) {
    let experiment = demo::storage_bottle().expect("demo geometry");
    let config = config();
    c.bench_function("single_particle", |b| {
        b.iter(|| {
            let mut particle = config.source.sample(3, particle_seed(&config, 3));
            propagate(&mut particle, &experiment, &config.propagation, &mut NullObserver)
        });
    });
}

fn bench_worker_scaling(c: &mut Criterion) {
    let experiment = demo::storage_bottle().expect("demo geometry");
    let config = config();
    let mut group = c.benchmark_group("worker_scaling_256");
    group.measurement_time(Duration::from_secs(10)).sample_size(20).throughput(Throughput::Elements(BATCH));
    for workers in [1_usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| run_batch(&experiment, black_box(&config), workers).expect("batch"));
        });
    }
    group.finish();
}

fn bench_rayon_baseline(c: &mut Criterion) {
    let experiment = demo::storage_bottle().expect("demo geometry");
    let config = config();
    let mut group = c.benchmark_group("rayon_baseline_256");
    group.measurement_time(Duration::from_secs(10)).sample_size(20).throughput(Throughput::Elements(BATCH));
    group.bench_function("par_iter", |b| {
        b.iter(|| {
            (0..BATCH)
                .into_par_iter()
                .map(|id| {
                    let mut particle = config.source.sample(id, particle_seed(&config, id));
                    propagate(&mut particle, &experiment, &config.propagation, &mut NullObserver)
                })
                .count()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_single, bench_worker_scaling, bench_rayon_baseline);
criterion_main!(benches);

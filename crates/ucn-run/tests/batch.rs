// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use proptest::prelude::*;

use ucn_core::{OutcomeKind, ParticleOutcome, TrackRecorder};
use ucn_run::{demo, particle_seed, replay, replay_observed, run_batch, RunConfig};

#[test]
fn ten_thousand_particles_all_terminate_once() {
    let experiment = demo::storage_bottle().expect("demo apparatus");
    let config = RunConfig { particles: 10_000, seed: 2024, ..RunConfig::default() };
    let report = run_batch(&experiment, &config, 8).expect("batch");

    assert_eq!(report.records.len(), 10_000);
    assert_eq!(report.tally.particles, 10_000);
    assert_eq!(report.tally.terminal(), 10_000);
    assert_eq!(report.tally.count(OutcomeKind::Propagating), 0);
    let anomalies: u64 = report.tally.anomalies.values().sum();
    assert_eq!(anomalies, report.tally.count(OutcomeKind::Anomalous));
    for (i, record) in report.records.iter().enumerate() {
        assert_eq!(record.id, i as u64);
        assert!(record.outcome.is_terminal());
    }
    assert!(report.tally.count(OutcomeKind::Detected) > 0);
}

#[test]
fn worker_count_does_not_change_results() {
    let experiment = demo::storage_bottle().expect("demo apparatus");
    let config = RunConfig { particles: 300, seed: 17, ..RunConfig::default() };
    let serial = run_batch(&experiment, &config, 1).expect("serial");
    for workers in [2, 3, 16] {
        let parallel = run_batch(&experiment, &config, workers).expect("parallel");
        assert_eq!(parallel, serial, "workers = {workers}");
    }
}

#[test]
fn replay_reproduces_a_batch_record() {
    let experiment = demo::storage_bottle().expect("demo apparatus");
    let config = RunConfig { particles: 100, seed: 5, ..RunConfig::default() };
    let report = run_batch(&experiment, &config, 4).expect("batch");
    for id in [0, 41, 99] {
        let again = replay(&experiment, &config, id).expect("replay");
        assert_eq!(again, report.records[id as usize]);
        assert_eq!(again.seed, particle_seed(&config, id));
    }
}

#[test]
fn observed_replay_records_the_track() {
    let experiment = demo::storage_bottle().expect("demo apparatus");
    let config = RunConfig { particles: 3, ..RunConfig::default() };
    let mut track = TrackRecorder::with_capacity(10_000);
    let record = replay_observed(&experiment, &config, 2, &mut track).expect("replay");
    let points = track.points();
    assert!(!points.is_empty());
    assert!(points.windows(2).all(|w| w[0].time <= w[1].time));
    let last = points.last().expect("terminal point");
    assert_eq!(last.time, record.time);
    assert_ne!(record.outcome, ParticleOutcome::Propagating);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn same_seed_same_tally(seed in any::<u64>(), particles in 1..40u64) {
        let experiment = demo::storage_bottle().expect("demo apparatus");
        let config = RunConfig { particles, seed, ..RunConfig::default() };
        let a = run_batch(&experiment, &config, 2).expect("batch");
        let b = run_batch(&experiment, &config, 3).expect("batch");
        prop_assert_eq!(a.tally.terminal(), particles);
        prop_assert_eq!(a, b);
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Seeded parallel batches.
//!
//! Workers claim fixed-size chunks of particle ids through an atomic
//! counter and propagate them against the shared, read-only [`Experiment`].
//! Each particle's seed is `derive_seed(batch seed, id)`, so results do not
//! depend on the worker count or on which worker ran which chunk, and any
//! particle can be replayed on its own.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ucn_core::{
    derive_seed, propagate, Bounces, Experiment, NullObserver, Observer, OutcomeKind, Particle,
    ParticleOutcome, Propagation, Vec3,
};

use crate::config::RunConfig;
use crate::error::RunError;
use crate::tally::Tally;

/// Particle ids claimed per fetch.
const CHUNK: u64 = 64;

/// Final state of one particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    /// Index within the batch.
    pub id: u64,
    /// Private seed.
    pub seed: u64,
    /// Terminal outcome.
    pub outcome: ParticleOutcome,
    /// Final simulation time (s).
    pub time: f64,
    /// Final position (m).
    pub position: Vec3,
    /// Final velocity (m/s).
    pub velocity: Vec3,
    /// Path length (m).
    pub distance: f64,
    /// Wall bounces.
    pub bounces: Bounces,
}

impl From<&Particle> for ParticleRecord {
    fn from(p: &Particle) -> Self {
        Self {
            id: p.id,
            seed: p.seed,
            outcome: p.outcome,
            time: p.time,
            position: p.position,
            velocity: p.velocity,
            distance: p.distance,
            bounces: p.bounces,
        }
    }
}

/// Result of [`run_batch`]: records in id order plus their tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Outcome counts.
    pub tally: Tally,
    /// One record per particle, ordered by id.
    pub records: Vec<ParticleRecord>,
}

/// Seed of particle `id` in a batch configured by `config`.
pub fn particle_seed(config: &RunConfig, id: u64) -> u64 {
    derive_seed(config.seed, id)
}

/// Propagates `config.particles` particles on up to `workers` threads.
pub fn run_batch(experiment: &Experiment, config: &RunConfig, workers: usize) -> Result<BatchReport, RunError> {
    validate(config)?;
    let total = config.particles;
    let chunks = usize::try_from(total.div_ceil(CHUNK)).unwrap_or(usize::MAX);
    let workers = workers.clamp(1, chunks.max(1));
    info!(particles = total, workers, seed = config.seed, "batch started");
    let started = Instant::now();

    let next = AtomicU64::new(0);
    let mut records: Vec<ParticleRecord> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let next = &next;
                s.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let first = next.fetch_add(CHUNK, Ordering::Relaxed);
                        if first >= total {
                            break;
                        }
                        for id in first..total.min(first + CHUNK) {
                            done.push(simulate(experiment, config, id, &mut NullObserver));
                        }
                    }
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| match h.join() {
                Ok(done) => done,
                Err(e) => std::panic::resume_unwind(e),
            })
            .collect()
    });
    records.sort_unstable_by_key(|r| r.id);

    let mut tally = Tally::default();
    for record in &records {
        tally.record(record);
    }
    info!(
        particles = tally.particles,
        decayed = tally.count(OutcomeKind::Decayed),
        absorbed = tally.count(OutcomeKind::Absorbed),
        detected = tally.count(OutcomeKind::Detected),
        lost = tally.count(OutcomeKind::Lost),
        anomalous = tally.count(OutcomeKind::Anomalous),
        elapsed_ms = started.elapsed().as_millis(),
        "batch finished"
    );
    Ok(BatchReport { tally, records })
}

/// Re-runs particle `id` of the batch alone; the record is identical to the
/// one [`run_batch`] produced for it.
pub fn replay(experiment: &Experiment, config: &RunConfig, id: u64) -> Result<ParticleRecord, RunError> {
    replay_observed(experiment, config, id, &mut NullObserver)
}

/// [`replay`] with an observer attached, e.g. to record the track.
pub fn replay_observed(
    experiment: &Experiment,
    config: &RunConfig,
    id: u64,
    observer: &mut dyn Observer,
) -> Result<ParticleRecord, RunError> {
    validate(config)?;
    if id >= config.particles {
        return Err(RunError::UnknownParticle { id, particles: config.particles });
    }
    Ok(simulate(experiment, config, id, observer))
}

fn simulate(experiment: &Experiment, config: &RunConfig, id: u64, observer: &mut dyn Observer) -> ParticleRecord {
    let mut particle = config.source.sample(id, particle_seed(config, id));
    let outcome = propagate(&mut particle, experiment, &config.propagation, observer);
    debug!(particle = id, outcome = %outcome, time = particle.time, "particle finished");
    ParticleRecord::from(&particle)
}

fn validate(config: &RunConfig) -> Result<(), RunError> {
    config.source.validate()?;
    validate_propagation(&config.propagation)
}

fn validate_propagation(p: &Propagation) -> Result<(), RunError> {
    let bad = |reason: &'static str| Err(RunError::InvalidPropagation { reason });
    let clock = &p.clock;
    if !(clock.run_end.is_finite() && clock.run_end > 0.0) {
        return bad("run end must be finite and positive");
    }
    if !(clock.max_step.is_finite() && clock.max_step > 0.0) {
        return bad("max step must be finite and positive");
    }
    if [clock.spin_interval, clock.field_interval, clock.track_interval]
        .iter()
        .any(|i| !(i.is_finite() && *i >= 0.0))
    {
        return bad("sampling intervals must be finite and non-negative");
    }
    let t = &p.tolerances;
    if [t.suspect_root, t.surface, t.coefficient, t.nudge].iter().any(|v| !(v.is_finite() && *v > 0.0)) {
        return bad("tolerances must be finite and positive");
    }
    if p.max_steps == 0 {
        return bad("max steps must be positive");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::demo;

    fn small() -> RunConfig {
        RunConfig { particles: 10, ..RunConfig::default() }
    }

    #[test]
    fn replay_outside_batch_is_rejected() {
        let experiment = demo::storage_bottle().unwrap();
        let err = replay(&experiment, &small(), 10).unwrap_err();
        assert!(matches!(err, RunError::UnknownParticle { id: 10, particles: 10 }));
    }

    #[test]
    fn zero_step_clock_is_rejected() {
        let experiment = demo::storage_bottle().unwrap();
        let mut config = small();
        config.propagation.clock.max_step = 0.0;
        assert!(matches!(
            run_batch(&experiment, &config, 2),
            Err(RunError::InvalidPropagation { .. })
        ));
    }

    #[test]
    fn empty_batch_is_empty() {
        let experiment = demo::storage_bottle().unwrap();
        let config = RunConfig { particles: 0, ..RunConfig::default() };
        let report = run_batch(&experiment, &config, 4).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.tally, Tally::default());
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Outcome counts for a batch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ucn_core::{AnomalyReason, OutcomeKind, ParticleOutcome};

use crate::batch::ParticleRecord;

/// Per-outcome counts plus a few batch-wide sums.
///
/// Every recorded particle lands in exactly one bucket of `outcomes`, so
/// the buckets always sum to `particles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    /// Particles recorded.
    pub particles: u64,
    /// Count per outcome kind.
    pub outcomes: BTreeMap<OutcomeKind, u64>,
    /// Anomalous particles broken down by reason.
    pub anomalies: BTreeMap<AnomalyReason, u64>,
    /// Specular bounces over all particles.
    pub specular_bounces: u64,
    /// Diffuse bounces over all particles.
    pub diffuse_bounces: u64,
    /// Sum of final simulation times (s).
    pub total_time: f64,
    /// Sum of path lengths (m).
    pub total_distance: f64,
}

impl Tally {
    /// Adds one particle.
    pub fn record(&mut self, record: &ParticleRecord) {
        self.particles += 1;
        *self.outcomes.entry(record.outcome.kind()).or_default() += 1;
        if let ParticleOutcome::Anomalous(reason) = record.outcome {
            *self.anomalies.entry(reason).or_default() += 1;
        }
        self.specular_bounces += record.bounces.specular;
        self.diffuse_bounces += record.bounces.diffuse;
        self.total_time += record.time;
        self.total_distance += record.distance;
    }

    /// Particles that ended as `kind`.
    pub fn count(&self, kind: OutcomeKind) -> u64 {
        self.outcomes.get(&kind).copied().unwrap_or(0)
    }

    /// Anomalous particles with `reason`.
    pub fn anomalies_of(&self, reason: AnomalyReason) -> u64 {
        self.anomalies.get(&reason).copied().unwrap_or(0)
    }

    /// Sum of the terminal buckets.
    pub fn terminal(&self) -> u64 {
        OutcomeKind::TERMINAL.iter().map(|kind| self.count(*kind)).sum()
    }

    /// Mean final simulation time, if any particle was recorded.
    pub fn mean_lifetime(&self) -> Option<f64> {
        (self.particles > 0).then(|| self.total_time / self.particles as f64)
    }

    /// Fraction of particles that ended as `kind`.
    pub fn fraction(&self, kind: OutcomeKind) -> f64 {
        if self.particles == 0 {
            0.0
        } else {
            self.count(kind) as f64 / self.particles as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucn_core::{Bounces, Vec3};

    fn record(outcome: ParticleOutcome, time: f64) -> ParticleRecord {
        ParticleRecord {
            id: 0,
            seed: 0,
            outcome,
            time,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            distance: 1.0,
            bounces: Bounces { specular: 2, diffuse: 1 },
        }
    }

    #[test]
    fn buckets_sum_to_particles() {
        let mut tally = Tally::default();
        tally.record(&record(ParticleOutcome::Decayed, 3.0));
        tally.record(&record(ParticleOutcome::Anomalous(AnomalyReason::StepLimit), 1.0));
        tally.record(&record(ParticleOutcome::Anomalous(AnomalyReason::StepLimit), 2.0));
        assert_eq!(tally.particles, 3);
        assert_eq!(tally.terminal(), 3);
        assert_eq!(tally.count(OutcomeKind::Anomalous), 2);
        assert_eq!(tally.anomalies_of(AnomalyReason::StepLimit), 2);
        assert_eq!(tally.anomalies_of(AnomalyReason::NoExit), 0);
        assert_eq!(tally.specular_bounces, 6);
        assert_eq!(tally.mean_lifetime(), Some(2.0));
    }

    #[test]
    fn empty_tally_has_no_lifetime() {
        let tally = Tally::default();
        assert_eq!(tally.mean_lifetime(), None);
        assert_eq!(tally.fraction(OutcomeKind::Lost), 0.0);
    }
}

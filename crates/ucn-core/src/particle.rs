// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Particle state.

use crate::constants::kinetic_energy;
use crate::math::Vec3;
use crate::spin::Spin;
use crate::state::ParticleOutcome;

/// Wall bounce counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounces {
    /// Mirror reflections.
    pub specular: u64,
    /// Diffuse reflections.
    pub diffuse: u64,
}

impl Bounces {
    /// All reflections.
    pub fn total(&self) -> u64 {
        self.specular + self.diffuse
    }
}

/// One simulated neutron.
///
/// Mutated only by [`crate::propagate`]; `outcome` records where it ended.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    /// Index within the batch.
    pub id: u64,
    /// World position (m).
    pub position: Vec3,
    /// Velocity (m/s).
    pub velocity: Vec3,
    /// Simulation time (s).
    pub time: f64,
    /// Spin state.
    pub spin: Spin,
    /// Seed of the particle's private random stream.
    pub seed: u64,
    /// Path length travelled (m).
    pub distance: f64,
    /// Wall bounces so far.
    pub bounces: Bounces,
    /// Current fate.
    pub outcome: ParticleOutcome,
}

impl Particle {
    /// A propagating particle at `t = 0` with spin up along z.
    pub fn new(id: u64, position: Vec3, velocity: Vec3, seed: u64) -> Self {
        Self {
            id,
            position,
            velocity,
            time: 0.0,
            spin: Spin::default(),
            seed,
            distance: 0.0,
            bounces: Bounces::default(),
            outcome: ParticleOutcome::Propagating,
        }
    }

    /// Replaces the spin.
    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = spin;
        self
    }

    /// Kinetic energy (eV).
    pub fn energy(&self) -> f64 {
        kinetic_energy(self.velocity.length())
    }
}

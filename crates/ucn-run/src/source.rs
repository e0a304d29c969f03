// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Initial conditions.
//!
//! Particles start uniformly inside a box with an isotropic direction and a
//! kinetic energy drawn uniformly in neV. The draws come from a stream
//! derived from the particle seed, separate from the stream `propagate`
//! uses, so changing the source never shifts wall or decay draws.

use core::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use ucn_core::constants::{speed_from_energy, NEV};
use ucn_core::{derive_seed, Particle, Prng, Spin, Vec3};

use crate::error::RunError;

/// Stream index of the source draws within a particle seed.
const SOURCE_STREAM: u64 = 1;

/// Box-shaped particle source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Centre of the start region (m).
    pub center: Vec3,
    /// Half-extents of the start region (m); zero gives a point source.
    pub half_extents: Vec3,
    /// Lower kinetic energy bound (neV).
    pub min_energy: f64,
    /// Upper kinetic energy bound (neV).
    pub max_energy: f64,
    /// Spin axis for a polarised beam; `None` draws an isotropic spin.
    pub polarisation: Option<Vec3>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            half_extents: Vec3::new(0.1, 0.1, 0.1),
            min_energy: 20.0,
            max_energy: 100.0,
            polarisation: None,
        }
    }
}

impl SourceConfig {
    /// Rejects regions and energy ranges that cannot be sampled.
    pub fn validate(&self) -> Result<(), RunError> {
        let bad = |reason: &'static str| Err(RunError::InvalidSource { reason });
        if !(self.center.is_finite() && self.half_extents.is_finite()) {
            return bad("region must be finite");
        }
        if self.half_extents.to_array().iter().any(|h| *h < 0.0) {
            return bad("half-extents must be non-negative");
        }
        if !(self.min_energy.is_finite() && self.max_energy.is_finite()) {
            return bad("energy bounds must be finite");
        }
        if self.min_energy <= 0.0 || self.max_energy < self.min_energy {
            return bad("energy bounds must satisfy 0 < min <= max");
        }
        if self.polarisation.is_some_and(|axis| axis.is_zero() || !axis.is_finite()) {
            return bad("polarisation axis must be a non-zero finite vector");
        }
        Ok(())
    }

    /// Particle `id` with private seed `seed`, at `t = 0`.
    pub fn sample(&self, id: u64, seed: u64) -> Particle {
        let mut rng = Prng::from_seed_u64(derive_seed(seed, SOURCE_STREAM));
        let h = self.half_extents;
        let offset = Vec3::new(
            rng.uniform(-h.x(), h.x()),
            rng.uniform(-h.y(), h.y()),
            rng.uniform(-h.z(), h.z()),
        );
        let energy = rng.uniform(self.min_energy, self.max_energy) * NEV;
        let velocity = isotropic(&mut rng).scale(speed_from_energy(energy));
        let spin = match self.polarisation {
            Some(axis) => Spin::along(axis),
            None => Spin::along(isotropic(&mut rng)),
        };
        Particle::new(id, self.center + offset, velocity, seed).with_spin(spin)
    }
}

/// Uniform direction on the unit sphere.
fn isotropic(rng: &mut Prng) -> Vec3 {
    let cos_theta = rng.uniform(-1.0, 1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = TAU * rng.next_f64();
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use ucn_core::constants::kinetic_energy;

    #[test]
    fn samples_stay_in_region_and_band() {
        let source = SourceConfig::default();
        for id in 0..200 {
            let p = source.sample(id, derive_seed(7, id));
            let local = p.position - source.center;
            for axis in 0..3 {
                assert!(local[axis].abs() <= source.half_extents[axis]);
            }
            let e = kinetic_energy(p.velocity.length()) / NEV;
            assert!(e >= source.min_energy - 1e-9 && e <= source.max_energy + 1e-9, "{e}");
            assert_eq!(p.seed, derive_seed(7, id));
        }
    }

    #[test]
    fn polarised_source_sets_the_spin() {
        let source = SourceConfig { polarisation: Some(Vec3::new(0.0, 2.0, 0.0)), ..SourceConfig::default() };
        let p = source.sample(0, 3);
        assert_eq!(p.spin.bloch(), Vec3::UNIT_Y);
    }

    #[test]
    fn rejects_inverted_energy_band() {
        let source = SourceConfig { min_energy: 50.0, max_energy: 10.0, ..SourceConfig::default() };
        assert!(matches!(source.validate(), Err(RunError::InvalidSource { .. })));
        assert!(SourceConfig::default().validate().is_ok());
    }

    #[test]
    fn same_seed_same_particle() {
        let source = SourceConfig::default();
        assert_eq!(source.sample(4, 99), source.sample(4, 99));
        assert_ne!(source.sample(4, 99).position, source.sample(4, 100).position);
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Neutron spin as a Bloch vector.

use crate::constants::NEUTRON_GYROMAGNETIC_RATIO;
use crate::math::{rotate_about, Prng, Vec3};

/// Unit Bloch vector; `s·û` is the polarisation along `û`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spin {
    bloch: Vec3,
}

impl Spin {
    /// Spin pointing along `direction`; a zero vector gives spin up along z.
    pub fn along(direction: Vec3) -> Self {
        let bloch = direction.normalize();
        if bloch.is_zero() {
            Self::default()
        } else {
            Self { bloch }
        }
    }

    /// The Bloch vector.
    pub fn bloch(&self) -> Vec3 {
        self.bloch
    }

    /// Forces the spin up (`true`) or down along `axis`.
    pub fn polarise(&mut self, axis: Vec3, up: bool) {
        let a = Self::along(axis).bloch;
        self.bloch = if up { a } else { -a };
    }

    /// Probability of measuring spin up along `axis`.
    pub fn probability_up(&self, axis: Vec3) -> f64 {
        let a = axis.normalize();
        (0.5 * (1.0 + self.bloch.dot(&a))).clamp(0.0, 1.0)
    }

    /// Projective measurement along `axis`; collapses the spin.
    pub fn measure_up(&mut self, axis: Vec3, rng: &mut Prng) -> bool {
        let up = rng.next_f64() < self.probability_up(axis);
        self.polarise(axis, up);
        up
    }

    /// Larmor precession in `field` (tesla) for `dt` seconds.
    ///
    /// `dS/dt = γ·S × B`, so the spin turns about `B̂` by `−γ|B|dt`.
    pub fn precess(&mut self, field: Vec3, dt: f64) {
        let magnitude = field.length();
        if magnitude == 0.0 || dt == 0.0 {
            return;
        }
        let axis = field.scale(1.0 / magnitude);
        let angle = -NEUTRON_GYROMAGNETIC_RATIO * magnitude * dt;
        self.bloch = rotate_about(self.bloch, axis, angle).normalize();
    }
}

impl Default for Spin {
    fn default() -> Self {
        Self { bloch: Vec3::UNIT_Z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_turn_about_z() {
        let mut s = Spin::along(Vec3::UNIT_X);
        let b = Vec3::new(0.0, 0.0, 1e-6);
        let quarter = FRAC_PI_2 / (NEUTRON_GYROMAGNETIC_RATIO.abs() * 1e-6);
        s.precess(b, quarter);
        // γ < 0, so the spin turns positively about +z: x → y.
        assert_relative_eq!(s.bloch().y(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(s.probability_up(Vec3::UNIT_X), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn field_parallel_to_spin_does_nothing() {
        let mut s = Spin::default();
        s.precess(Vec3::new(0.0, 0.0, 1e-3), 10.0);
        assert_relative_eq!(s.bloch().z(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn measurement_collapses() {
        let mut s = Spin::along(Vec3::UNIT_X);
        let mut rng = Prng::from_seed_u64(5);
        let up = s.measure_up(Vec3::UNIT_Z, &mut rng);
        let expected = if up { 1.0 } else { 0.0 };
        assert_relative_eq!(s.probability_up(Vec3::UNIT_Z), expected);
    }
}

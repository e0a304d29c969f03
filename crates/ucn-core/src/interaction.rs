// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wall physics applied when the navigator reports a crossing.
//!
//! What happens depends on the kind of the volume the particle entered:
//!
//! | Kind        | Effect                                                    |
//! |-------------|-----------------------------------------------------------|
//! | Tracking    | nothing                                                   |
//! | Boundary    | absorption test, then specular or diffuse reflection      |
//! | Detector    | detection draw, then the boundary rules on a miss         |
//! | BlackHole   | lost                                                      |
//!
//! For a wall with Fermi potential `V_F`, loss factor `η` and roughness `r`,
//! with `E⊥ = E·cos²θ` the kinetic energy normal to the surface:
//! - with wall losses on, `E⊥ ≥ V_F` always absorbs; below the barrier the
//!   absorption probability is `2η·√(E⊥ / (V_F − E⊥))`;
//! - a surviving particle reflects diffusely with probability `r·E⊥/V_F`
//!   and specularly otherwise.

use core::f64::consts::TAU;

use crate::constants::kinetic_energy;
use crate::geometry::VolumeKind;
use crate::material::Material;
use crate::math::{any_perpendicular, rotate_about, Prng, Vec3};
use crate::state::ParticleOutcome;

/// Upper end of the `u` draw for diffuse reflection; keeps `θ` off the
/// grazing limit.
const DIFFUSE_U_MAX: f64 = 0.499;

/// Reflection model that produced a bounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BounceKind {
    /// Mirror reflection.
    Specular,
    /// Cosine-weighted random direction.
    Diffuse,
}

/// A reflection off a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    /// Which reflection model applied.
    pub kind: BounceKind,
    /// Velocity after the bounce.
    pub velocity: Vec3,
    /// Kinetic energy normal to the wall before the bounce (eV).
    pub normal_energy: f64,
}

/// Result of crossing into a volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// Keep going, nothing changed.
    Continue,
    /// The particle was turned around and stays on its side of the wall.
    Reflected(Bounce),
    /// Propagation ends.
    Terminal(ParticleOutcome),
}

/// Applies the rules of the entered volume's kind.
///
/// `normal` is the crossed surface's normal in either orientation.
pub fn interact(
    kind: VolumeKind,
    material: &Material,
    velocity: Vec3,
    normal: Vec3,
    wall_losses: bool,
    rng: &mut Prng,
) -> Interaction {
    match kind {
        VolumeKind::Tracking => Interaction::Continue,
        VolumeKind::BlackHole => Interaction::Terminal(ParticleOutcome::Lost),
        VolumeKind::Detector { efficiency } => {
            if rng.next_f64() < efficiency {
                Interaction::Terminal(ParticleOutcome::Detected)
            } else {
                wall(material, velocity, normal, wall_losses, rng)
            }
        }
        VolumeKind::Boundary => wall(material, velocity, normal, wall_losses, rng),
    }
}

fn wall(material: &Material, velocity: Vec3, normal: Vec3, wall_losses: bool, rng: &mut Prng) -> Interaction {
    let speed = velocity.length();
    // Inward normal: back into the region the particle came from.
    let inward = if normal.dot(&velocity) > 0.0 { -normal } else { normal };
    let cos_theta = if speed > 0.0 { velocity.dot(&inward).abs() / speed } else { 0.0 };
    let energy = kinetic_energy(speed);
    let normal_energy = energy * cos_theta * cos_theta;
    let v_f = material.fermi_potential;

    if wall_losses {
        if normal_energy >= v_f {
            return Interaction::Terminal(ParticleOutcome::Absorbed);
        }
        let p_loss = 2.0 * material.eta * (normal_energy / (v_f - normal_energy)).sqrt();
        if rng.next_f64() < p_loss {
            return Interaction::Terminal(ParticleOutcome::Absorbed);
        }
    }

    let p_diffuse = if v_f > 0.0 { material.roughness * normal_energy / v_f } else { 0.0 };
    let bounce = if rng.next_f64() < p_diffuse {
        Bounce { kind: BounceKind::Diffuse, velocity: diffuse(inward, speed, rng), normal_energy }
    } else {
        Bounce { kind: BounceKind::Specular, velocity: specular(velocity, inward), normal_energy }
    };
    Interaction::Reflected(bounce)
}

/// Mirrors `velocity` about the plane with unit normal `normal`.
pub fn specular(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - normal.scale(2.0 * velocity.dot(&normal))
}

/// Draws a cosine-weighted direction about the unit normal `inward` and
/// scales it to `speed`.
pub fn diffuse(inward: Vec3, speed: f64, rng: &mut Prng) -> Vec3 {
    let phi = TAU * rng.next_f64();
    let u = rng.uniform(0.0, DIFFUSE_U_MAX);
    let theta = (1.0 - 2.0 * u).sqrt().acos();
    let tilted = rotate_about(inward, any_perpendicular(inward), theta);
    rotate_about(tilted, inward, phi).scale(speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{speed_from_energy, NEV};
    use approx::assert_relative_eq;

    fn steel() -> Material {
        Material::new("steel", 190.0 * NEV, 0.0, 0.0)
    }

    #[test]
    fn normal_incidence_reverses() {
        let v = Vec3::new(0.0, 0.0, -3.0);
        let mut rng = Prng::from_seed_u64(1);
        let r = interact(VolumeKind::Boundary, &steel(), v, Vec3::UNIT_Z, true, &mut rng);
        match r {
            Interaction::Reflected(b) => {
                assert_eq!(b.kind, BounceKind::Specular);
                assert_relative_eq!(b.velocity.z(), 3.0);
            }
            other => unreachable!("expected a bounce, got {other:?}"),
        }
    }

    #[test]
    fn above_barrier_is_absorbed() {
        let v = Vec3::new(0.0, 0.0, -speed_from_energy(250.0 * NEV));
        let mut rng = Prng::from_seed_u64(1);
        let r = interact(VolumeKind::Boundary, &steel(), v, -Vec3::UNIT_Z, true, &mut rng);
        assert_eq!(r, Interaction::Terminal(ParticleOutcome::Absorbed));
    }

    #[test]
    fn above_barrier_reflects_without_losses() {
        let v = Vec3::new(0.0, 0.0, -speed_from_energy(250.0 * NEV));
        let mut rng = Prng::from_seed_u64(1);
        let r = interact(VolumeKind::Boundary, &steel(), v, Vec3::UNIT_Z, false, &mut rng);
        assert!(matches!(r, Interaction::Reflected(_)));
    }

    #[test]
    fn grazing_particle_sees_little_normal_energy() {
        let v = Vec3::new(10.0, 0.0, -0.1);
        let mut rng = Prng::from_seed_u64(3);
        let Interaction::Reflected(b) = interact(VolumeKind::Boundary, &steel(), v, Vec3::UNIT_Z, true, &mut rng)
        else {
            unreachable!("lossless grazing hit must reflect");
        };
        assert_relative_eq!(b.normal_energy, kinetic_energy(0.1), max_relative = 1e-9);
    }

    #[test]
    fn black_hole_and_detector() {
        let mut rng = Prng::from_seed_u64(9);
        let v = Vec3::UNIT_X;
        assert_eq!(
            interact(VolumeKind::BlackHole, &steel(), v, Vec3::UNIT_X, true, &mut rng),
            Interaction::Terminal(ParticleOutcome::Lost)
        );
        assert_eq!(
            interact(VolumeKind::Detector { efficiency: 1.0 }, &steel(), v, Vec3::UNIT_X, true, &mut rng),
            Interaction::Terminal(ParticleOutcome::Detected)
        );
        assert!(matches!(
            interact(VolumeKind::Detector { efficiency: 0.0 }, &steel(), v, Vec3::UNIT_X, true, &mut rng),
            Interaction::Reflected(_)
        ));
        assert_eq!(
            interact(VolumeKind::Tracking, &steel(), v, Vec3::UNIT_X, true, &mut rng),
            Interaction::Continue
        );
    }

    #[test]
    fn diffuse_stays_in_inward_hemisphere() {
        let mut rng = Prng::from_seed_u64(42);
        let inward = Vec3::new(1.0, 1.0, 0.0).normalize();
        for _ in 0..1000 {
            let v = diffuse(inward, 5.0, &mut rng);
            assert_relative_eq!(v.length(), 5.0, max_relative = 1e-12);
            assert!(v.dot(&inward) > 0.0);
        }
    }
}

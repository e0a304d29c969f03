// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Math helpers: vectors, quaternions, rigid transforms, bounding boxes, and
//! the per-particle pseudo-random generator.
//!
//! Everything is `f64`; boundary finding works at the 1e-10 m scale and needs
//! the headroom.

mod aabb;
mod prng;
mod quat;
mod transform;
mod vec3;

pub use aabb::Aabb;
pub use prng::{derive_seed, Prng};
pub use quat::Quat;
pub use transform::Transform;
pub use vec3::Vec3;

/// Degeneracy threshold for normalising vectors and quaternions.
pub const EPSILON: f64 = 1e-12;

/// Returns a unit vector perpendicular to `n`.
///
/// Crosses `n` with the coordinate axis it is least aligned with, so the
/// result is well conditioned for any non-zero `n`.
pub fn any_perpendicular(n: Vec3) -> Vec3 {
    let a = n.abs();
    let axis = if a.x() <= a.y() && a.x() <= a.z() {
        Vec3::UNIT_X
    } else if a.y() <= a.z() {
        Vec3::UNIT_Y
    } else {
        Vec3::UNIT_Z
    };
    n.cross(&axis).normalize()
}

/// Rotates `v` about the unit axis `k` by `angle` radians (Rodrigues).
pub fn rotate_about(v: Vec3, k: Vec3, angle: f64) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    v.scale(cos) + k.cross(&v).scale(sin) + k.scale(k.dot(&v) * (1.0 - cos))
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Vec3, EPSILON};

/// Unit quaternion stored as `(x, y, z, w)` describing a rotation.
///
/// * All angles are expressed in radians.
/// * Rotations are active: [`Quat::rotate`] turns a vector, it does not
///   re-express it in a rotated basis.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat {
    data: [f64; 4],
}

impl Quat {
    /// Creates a quaternion from components.
    ///
    /// Callers should provide finite components; use
    /// [`Quat::from_axis_angle`] for axis/angle construction.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { data: [x, y, z, w] }
    }

    /// Returns the identity quaternion.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Returns the quaternion as an array.
    pub fn to_array(self) -> [f64; 4] {
        self.data
    }

    /// Constructs a quaternion from a rotation axis and angle in radians.
    ///
    /// Returns the identity quaternion when the axis length is ≤ `EPSILON`.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let len_sq = axis.length_squared();
        if len_sq <= EPSILON * EPSILON {
            return Self::identity();
        }
        let norm_axis = axis.scale(1.0 / len_sq.sqrt());
        let (sin_half, cos_half) = (angle * 0.5).sin_cos();
        let scaled = norm_axis.scale(sin_half);
        Self::new(scaled.x(), scaled.y(), scaled.z(), cos_half)
    }

    /// Hamilton product of two quaternions (`self * other`).
    ///
    /// The result applies `other` first and then `self`.
    pub fn multiply(&self, other: &Self) -> Self {
        let [ax, ay, az, aw] = self.data;
        let [bx, by, bz, bw] = other.data;
        Self::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// Conjugate; the inverse rotation for a unit quaternion.
    pub fn conjugate(&self) -> Self {
        let [x, y, z, w] = self.data;
        Self::new(-x, -y, -z, w)
    }

    /// Normalises the quaternion to unit length.
    ///
    /// Returns the identity quaternion when the norm is ≤ `EPSILON`.
    pub fn normalize(&self) -> Self {
        let [x, y, z, w] = self.data;
        let len = (x * x + y * y + z * z + w * w).sqrt();
        if len <= EPSILON {
            return Self::identity();
        }
        let inv = 1.0 / len;
        Self::new(x * inv, y * inv, z * inv, w * inv)
    }

    /// Rotates a vector by this quaternion.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        // v' = v + 2w(q × v) + 2 q × (q × v)
        let [x, y, z, w] = self.data;
        let q = Vec3::new(x, y, z);
        let t = q.cross(&v).scale(2.0);
        v + t.scale(w) + q.cross(&t)
    }

    /// Returns `true` when this rotation is exactly the identity.
    pub fn is_identity(&self) -> bool {
        self.data == [0.0, 0.0, 0.0, 1.0]
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let q = Quat::from_axis_angle(Vec3::UNIT_Z, FRAC_PI_2);
        let r = q.rotate(Vec3::UNIT_X);
        assert_relative_eq!(r.x(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(r.y(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn conjugate_undoes_rotation() {
        let q = Quat::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), 0.7);
        let v = Vec3::new(0.3, -1.2, 4.0);
        let back = q.conjugate().rotate(q.rotate(v));
        assert_relative_eq!(back.x(), v.x(), epsilon = 1e-12);
        assert_relative_eq!(back.y(), v.y(), epsilon = 1e-12);
        assert_relative_eq!(back.z(), v.z(), epsilon = 1e-12);
    }
}

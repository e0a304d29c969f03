// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Quat, Vec3};

/// Rigid local-to-parent transform used to place volumes and composite parts.
///
/// Conventions:
/// - `translation` in metres, expressed in the parent frame.
/// - `rotation` as a unit quaternion (normalised on construction).
/// - A local point `p` maps to the parent frame as `R·p + t`.
///
/// There is no scale: shape boundary times are solved in the local frame and
/// must stay valid in the parent frame, which only holds for isometries.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
}

impl Transform {
    /// Identity transform.
    pub const fn identity() -> Self {
        Self { translation: Vec3::ZERO, rotation: Quat::identity() }
    }

    /// Creates a transform from components.
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self { translation, rotation: rotation.normalize() }
    }

    /// Pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, rotation: Quat::identity() }
    }

    /// Translation component.
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Rotation component.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Maps a local point into the parent frame.
    pub fn point_to_parent(&self, p: Vec3) -> Vec3 {
        self.rotation.rotate(p) + self.translation
    }

    /// Maps a parent-frame point into the local frame.
    pub fn point_to_local(&self, p: Vec3) -> Vec3 {
        self.rotation.conjugate().rotate(p - self.translation)
    }

    /// Maps a local direction into the parent frame.
    pub fn direction_to_parent(&self, d: Vec3) -> Vec3 {
        self.rotation.rotate(d)
    }

    /// Maps a parent-frame direction into the local frame.
    pub fn direction_to_local(&self, d: Vec3) -> Vec3 {
        self.rotation.conjugate().rotate(d)
    }

    /// Composes `self` (parent-to-grandparent) with `child` (child-to-parent),
    /// returning the child-to-grandparent transform.
    pub fn then(&self, child: &Self) -> Self {
        Self {
            translation: self.point_to_parent(child.translation),
            rotation: self.rotation.multiply(&child.rotation).normalize(),
        }
    }

    /// Returns `true` when both components are finite.
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.to_array().iter().all(|c| c.is_finite())
    }
}

impl Default for Transform {
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
    fn point_round_trips_through_parent_frame() {
        let t = Transform::new(
            Vec3::new(1.0, -2.0, 0.5),
            Quat::from_axis_angle(Vec3::UNIT_Y, 0.3),
        );
        let p = Vec3::new(0.2, 0.4, -0.9);
        let back = t.point_to_local(t.point_to_parent(p));
        assert_relative_eq!(back.distance(&p), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn composition_matches_sequential_application() {
        let outer = Transform::new(Vec3::new(0.0, 0.0, 1.0), Quat::from_axis_angle(Vec3::UNIT_Z, FRAC_PI_2));
        let inner = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let composed = outer.then(&inner);
        let p = Vec3::new(0.5, 0.0, 0.0);
        let expected = outer.point_to_parent(inner.point_to_parent(p));
        assert_relative_eq!(composed.point_to_parent(p).distance(&expected), 0.0, epsilon = 1e-14);
    }
}

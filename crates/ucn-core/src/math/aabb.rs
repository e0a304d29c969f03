// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Transform, Vec3};

/// Axis-aligned bounding box in a shape's local frame.
///
/// Invariant: `min` components are less than or equal to `max` components.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Constructs an AABB from two corners, ordering components as needed.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { min: a.min(&b), max: a.max(&b) }
    }

    /// Builds an AABB centred at `center` with the given half-extents.
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    /// Returns the minimum corner.
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Returns the maximum corner.
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Centre of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max).scale(0.5)
    }

    /// Half-extents of the box.
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min).scale(0.5)
    }

    /// Returns the union of two AABBs.
    pub fn union(&self, other: &Self) -> Self {
        Self { min: self.min.min(&other.min), max: self.max.max(&other.max) }
    }

    /// Returns the overlap of two AABBs, or `None` when they are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min = self.min.max(&other.min);
        let max = self.max.min(&other.max);
        if min.x() > max.x() || min.y() > max.y() || min.z() > max.z() {
            return None;
        }
        Some(Self { min, max })
    }

    /// Computes the AABB that bounds this box after mapping it to the parent
    /// frame of `transform`.
    ///
    /// Evaluates the eight corners and takes component-wise extrema, so the
    /// result is conservative under rotation.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let corners = [
            Vec3::new(self.min.x(), self.min.y(), self.min.z()),
            Vec3::new(self.max.x(), self.min.y(), self.min.z()),
            Vec3::new(self.min.x(), self.max.y(), self.min.z()),
            Vec3::new(self.max.x(), self.max.y(), self.min.z()),
            Vec3::new(self.min.x(), self.min.y(), self.max.z()),
            Vec3::new(self.max.x(), self.min.y(), self.max.z()),
            Vec3::new(self.min.x(), self.max.y(), self.max.z()),
            Vec3::new(self.max.x(), self.max.y(), self.max.z()),
        ];
        let first = transform.point_to_parent(corners[0]);
        let (min, max) = corners[1..].iter().fold((first, first), |(lo, hi), c| {
            let p = transform.point_to_parent(*c);
            (lo.min(&p), hi.max(&p))
        });
        Self { min, max }
    }
}

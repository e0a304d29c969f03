// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fields acting on a particle.
//!
//! Gravity is the only force on the trajectory and must be uniform.
//! Magnetic fields only drive spin precession and may vary in space.

use core::fmt::Debug;

use crate::constants::STANDARD_GRAVITY;
use crate::math::{Transform, Vec3};
use crate::shape::{BoundaryTime, Shape};

/// Uniform acceleration (m/s²).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GravField {
    accel: Vec3,
}

impl GravField {
    /// Arbitrary acceleration vector.
    pub fn new(accel: Vec3) -> Self {
        Self { accel }
    }

    /// Earth gravity along −z.
    pub fn standard() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -STANDARD_GRAVITY))
    }

    /// No acceleration.
    pub fn zero() -> Self {
        Self::new(Vec3::ZERO)
    }

    /// Acceleration vector.
    pub fn accel(&self) -> Vec3 {
        self.accel
    }
}

impl Default for GravField {
    fn default() -> Self {
        Self::standard()
    }
}

/// A magnetic field source sampled for spin precession.
pub trait MagField: Debug + Send + Sync {
    /// Field (tesla) at a world point and time.
    fn field_at(&self, point: Vec3, time: f64) -> Vec3;
}

/// Constant field, optionally confined to a placed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformMagField {
    field: Vec3,
    region: Option<(Shape, Transform)>,
}

impl UniformMagField {
    /// Field filling all space.
    pub fn new(field: Vec3) -> Self {
        Self { field, region: None }
    }

    /// Restricts the field to `shape` placed in the world by `placement`.
    pub fn within(mut self, shape: Shape, placement: Transform) -> Self {
        self.region = Some((shape, placement));
        self
    }
}

impl MagField for UniformMagField {
    fn field_at(&self, point: Vec3, _time: f64) -> Vec3 {
        match &self.region {
            Some((shape, placement)) if !shape.contains(placement.point_to_local(point)) => Vec3::ZERO,
            _ => self.field,
        }
    }
}

/// Sum of magnetic field sources.
#[derive(Debug, Default)]
pub struct MagFieldSet {
    sources: Vec<Box<dyn MagField>>,
}

impl MagFieldSet {
    /// No sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source.
    pub fn push(&mut self, source: impl MagField + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether there are no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Total field at a point.
    pub fn field_at(&self, point: Vec3, time: f64) -> Vec3 {
        self.sources.iter().fold(Vec3::ZERO, |acc, s| acc + s.field_at(point, time))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn confined_field_vanishes_outside() {
        let f = UniformMagField::new(Vec3::new(0.0, 0.0, 1e-6))
            .within(Shape::cuboid(1.0, 1.0, 1.0).unwrap(), Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(f.field_at(Vec3::ZERO, 0.0), Vec3::ZERO);
        assert_eq!(f.field_at(Vec3::new(5.5, 0.0, 0.0), 0.0).z(), 1e-6);
    }

    #[test]
    fn set_sums_sources() {
        let mut set = MagFieldSet::new();
        set.push(UniformMagField::new(Vec3::new(1e-6, 0.0, 0.0)));
        set.push(UniformMagField::new(Vec3::new(0.0, 2e-6, 0.0)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.field_at(Vec3::ZERO, 0.0), Vec3::new(1e-6, 2e-6, 0.0));
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ballistic motion under constant acceleration.

use crate::math::{Transform, Vec3};

/// A point moving as `p(t) = p + v·t + ½·a·t²`, expressed in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    /// Position at `t = 0`.
    pub point: Vec3,
    /// Velocity at `t = 0`.
    pub velocity: Vec3,
    /// Constant acceleration.
    pub accel: Vec3,
}

impl Trajectory {
    /// Creates a trajectory from its initial state.
    pub fn new(point: Vec3, velocity: Vec3, accel: Vec3) -> Self {
        Self { point, velocity, accel }
    }

    /// Position after `t` seconds.
    pub fn position_at(&self, t: f64) -> Vec3 {
        self.point + self.velocity.scale(t) + self.accel.scale(0.5 * t * t)
    }

    /// Velocity after `t` seconds.
    pub fn velocity_at(&self, t: f64) -> Vec3 {
        self.velocity + self.accel.scale(t)
    }

    /// The same motion restarted `t` seconds later.
    pub fn advanced(&self, t: f64) -> Self {
        Self { point: self.position_at(t), velocity: self.velocity_at(t), accel: self.accel }
    }

    /// Re-expresses the trajectory in the local frame of `transform`.
    pub fn to_local(&self, transform: &Transform) -> Self {
        Self {
            point: transform.point_to_local(self.point),
            velocity: transform.direction_to_local(self.velocity),
            accel: transform.direction_to_local(self.accel),
        }
    }

    /// Path length travelled over `[0, t]`.
    pub fn arc_length(&self, t: f64) -> f64 {
        arc_length(self.velocity, self.accel, t)
    }
}

/// Length of the parabolic arc traced over `[0, t]` starting with velocity
/// `v` under acceleration `a`.
///
/// Splits `v` into components along and across `a`; the speed is then
/// `sqrt(h² + u²)` with `u` linear in time, which integrates in closed form.
pub fn arc_length(v: Vec3, a: Vec3, t: f64) -> f64 {
    let g = a.length();
    if g == 0.0 || t == 0.0 {
        return v.length() * t.abs();
    }
    let axis = a.scale(1.0 / g);
    let u0 = v.dot(&axis);
    let h = (v - axis.scale(u0)).length();
    let u1 = u0 + g * t;
    (antiderivative(u1, h) - antiderivative(u0, h)) / g
}

fn antiderivative(u: f64, h: f64) -> f64 {
    if h == 0.0 {
        return 0.5 * u * u.abs();
    }
    0.5 * (u * (h * h + u * u).sqrt() + h * h * (u / h).asinh())
}

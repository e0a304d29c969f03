// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Aabb, Vec3};
use crate::parabola::Trajectory;
use crate::poly::{solve_quadratic, Roots};
use crate::shape::{
    keep_smallest, select_root, snap_coefficients, BoundaryError, BoundaryTime, ShapeError,
};
use crate::tolerance::Tolerances;

/// Axis-aligned box centred on the local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    half: Vec3,
}

impl BoxShape {
    /// Box with half-extents `dx`, `dy`, `dz`; each must be finite and positive.
    pub fn new(dx: f64, dy: f64, dz: f64) -> Result<Self, ShapeError> {
        for (what, value) in [("box dx", dx), ("box dy", dy), ("box dz", dz)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ShapeError::NonPositive { what, value });
            }
        }
        Ok(Self { half: Vec3::new(dx, dy, dz) })
    }

    pub(crate) fn from_half_extents(half: Vec3) -> Self {
        Self { half }
    }

    /// Half-extents along x, y, z.
    pub fn half_extents(&self) -> Vec3 {
        self.half
    }

    /// Roots of `½a·t² + v·t + (p − face) = 0` for the plane at `face` on
    /// `axis`.
    pub(crate) fn plane_roots(
        traj: &Trajectory,
        axis: usize,
        face: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Roots {
        let mut ab = [0.5 * traj.accel[axis], traj.velocity[axis]];
        snap_coefficients(&mut ab, tol.coefficient);
        let mut c = traj.point[axis] - face;
        if on_boundary && c.abs() < tol.on_surface() {
            c = 0.0;
        }
        solve_quadratic(ab[0], ab[1], c)
    }

    fn on_surface(&self, p: Vec3, tol: &Tolerances) -> bool {
        (0..3).all(|i| p[i].abs() <= self.half[i] + tol.surface)
    }
}

impl BoundaryTime for BoxShape {
    fn contains(&self, point: Vec3) -> bool {
        (0..3).all(|i| point[i].abs() <= self.half[i])
    }

    fn time_from_inside(
        &self,
        traj: &Trajectory,
        _max_time: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<f64, BoundaryError> {
        let mut best = None;
        for axis in 0..3 {
            for face in [self.half[axis], -self.half[axis]] {
                let roots = Self::plane_roots(traj, axis, face, on_boundary, tol);
                best = keep_smallest(best, select_root(&roots, on_boundary, tol, |_| true)?);
            }
        }
        best.ok_or(BoundaryError::NoExit)
    }

    fn time_from_outside(
        &self,
        traj: &Trajectory,
        max_time: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<f64, BoundaryError> {
        let mut best = None;
        for axis in 0..3 {
            for face in [self.half[axis], -self.half[axis]] {
                let roots = Self::plane_roots(traj, axis, face, on_boundary, tol);
                let hit = select_root(&roots, on_boundary, tol, |t| {
                    self.on_surface(traj.position_at(t), tol)
                })?;
                best = keep_smallest(best, hit);
            }
        }
        Ok(best.filter(|t| *t <= max_time).unwrap_or(f64::INFINITY))
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        let gaps = (0..3).map(|i| (self.half[i] - point[i].abs()).abs());
        let (axis, _) = gaps
            .enumerate()
            .fold((0, f64::INFINITY), |(ai, ag), (i, g)| if g < ag { (i, g) } else { (ai, ag) });
        let sign = if point[axis] < 0.0 { -1.0 } else { 1.0 };
        let mut n = [0.0; 3];
        n[axis] = sign;
        Vec3::from(n)
    }

    fn surface_distance(&self, point: Vec3) -> f64 {
        (0..3).map(|i| (self.half[i] - point[i].abs()).abs()).fold(f64::INFINITY, f64::min)
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_center_half_extents(Vec3::ZERO, self.half)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoxShape {
        BoxShape::new(1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn rejects_degenerate_extents() {
        assert!(matches!(BoxShape::new(1.0, 0.0, 1.0), Err(ShapeError::NonPositive { what: "box dy", .. })));
        assert!(BoxShape::new(f64::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn exit_through_positive_x_face() {
        let traj = Trajectory::new(Vec3::ZERO, Vec3::UNIT_X, Vec3::ZERO);
        let t = unit_box().time_from_inside(&traj, 10.0, false, &Tolerances::default());
        assert_eq!(t, Ok(1.0));
    }

    #[test]
    fn face_underfoot_is_not_the_next_exit() {
        // Sitting on +x, heading back in: the next exit is the -x face.
        let traj = Trajectory::new(Vec3::new(1.0, 0.0, 0.0), -Vec3::UNIT_X, Vec3::ZERO);
        let t = unit_box().time_from_inside(&traj, 10.0, true, &Tolerances::default());
        assert_eq!(t, Ok(2.0));
    }

    #[test]
    fn outside_hit_must_land_on_face() {
        // The x = -1 plane is reached at t = 1 but at y = 3, off the box.
        let traj = Trajectory::new(Vec3::new(-2.0, 2.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::ZERO);
        let t = unit_box().time_from_outside(&traj, 10.0, false, &Tolerances::default());
        assert_eq!(t, Ok(f64::INFINITY));
    }

    #[test]
    fn outside_hit_under_gravity() {
        // Falling onto the top face from 1 m above it.
        let g = Vec3::new(0.0, 0.0, -9.81);
        let traj = Trajectory::new(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, g);
        let t = unit_box().time_from_outside(&traj, 10.0, false, &Tolerances::default());
        assert_relative_eq!(t.unwrap(), (2.0 / 9.81_f64).sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn outside_hit_beyond_budget_is_infinite() {
        let traj = Trajectory::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::UNIT_X, Vec3::ZERO);
        let t = unit_box().time_from_outside(&traj, 1.5, false, &Tolerances::default());
        assert_eq!(t, Ok(f64::INFINITY));
    }

    #[test]
    fn at_rest_on_face_is_ambiguous() {
        // On the top face at the apex of a hop: both roots of the top-face
        // equation land within the suspect window.
        let traj = Trajectory::new(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.5, 0.0, 1e-9),
            Vec3::new(0.0, 0.0, -9.81),
        );
        let r = unit_box().time_from_inside(&traj, 10.0, true, &Tolerances::default());
        assert_eq!(r, Err(BoundaryError::AmbiguousRoots { count: 2 }));
    }

    #[test]
    fn normal_picks_nearest_face() {
        let n = unit_box().normal(Vec3::new(0.2, -0.999_999, 0.3));
        assert_eq!(n, -Vec3::UNIT_Y);
    }
}

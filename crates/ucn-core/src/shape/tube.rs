// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Aabb, Vec3};
use crate::parabola::Trajectory;
use crate::poly::{solve_quartic, Roots};
use crate::shape::{
    bounding_box_entry, keep_smallest, select_root, snap_coefficients, BoundaryError,
    BoundaryTime, BoxShape, ShapeError,
};
use crate::tolerance::Tolerances;

/// Cylinder (`rmin = 0`) or cylindrical shell along the local z axis,
/// centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tube {
    rmin: f64,
    rmax: f64,
    dz: f64,
}

/// Which surface of a tube a point is nearest to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    Cap,
    Outer,
    Inner,
}

impl Tube {
    /// Tube with inner radius `rmin`, outer radius `rmax`, half-length `dz`.
    pub fn new(rmin: f64, rmax: f64, dz: f64) -> Result<Self, ShapeError> {
        if !(dz.is_finite() && dz > 0.0) {
            return Err(ShapeError::NonPositive { what: "tube dz", value: dz });
        }
        if !(rmax.is_finite() && rmax > 0.0) {
            return Err(ShapeError::NonPositive { what: "tube rmax", value: rmax });
        }
        if !(rmin.is_finite() && rmin >= 0.0 && rmin < rmax) {
            return Err(ShapeError::InvalidRadii { rmin, rmax });
        }
        Ok(Self { rmin, rmax, dz })
    }

    /// Inner radius; zero for a solid cylinder.
    pub fn rmin(&self) -> f64 {
        self.rmin
    }

    /// Outer radius.
    pub fn rmax(&self) -> f64 {
        self.rmax
    }

    /// Half-length along z.
    pub fn dz(&self) -> f64 {
        self.dz
    }

    fn has_inner(&self) -> bool {
        self.rmin > 0.0
    }

    /// Roots of `r(t)² = radius²` where `r` is the distance from the z axis.
    fn radial_roots(
        traj: &Trajectory,
        radius: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<Roots, BoundaryError> {
        let (p, v, a) = (traj.point, traj.velocity, traj.accel);
        let mut coeffs = [
            0.25 * (a.x() * a.x() + a.y() * a.y()),
            v.x() * a.x() + v.y() * a.y(),
            p.x() * a.x() + p.y() * a.y() + v.x() * v.x() + v.y() * v.y(),
            2.0 * (p.x() * v.x() + p.y() * v.y()),
        ];
        snap_coefficients(&mut coeffs, tol.coefficient);
        let r_sq = p.x() * p.x() + p.y() * p.y();
        let mut e = r_sq - radius * radius;
        let near = (r_sq.sqrt() - radius).abs() < tol.on_surface() || e.abs() < tol.on_surface();
        if on_boundary && near {
            e = 0.0;
        }
        let [qa, qb, qc, qd] = coeffs;
        Ok(solve_quartic(qa, qb, qc, qd, e)?)
    }

    fn radius_at(traj: &Trajectory, t: f64) -> f64 {
        let p = traj.position_at(t);
        p.x().hypot(p.y())
    }

    fn nearest_surface(&self, point: Vec3) -> (Surface, f64) {
        let r = point.x().hypot(point.y());
        let mut best = (Surface::Cap, (self.dz - point.z().abs()).abs());
        let outer = (self.rmax - r).abs();
        if outer < best.1 {
            best = (Surface::Outer, outer);
        }
        if self.has_inner() {
            let inner = (r - self.rmin).abs();
            if inner < best.1 {
                best = (Surface::Inner, inner);
            }
        }
        best
    }
}

impl BoundaryTime for Tube {
    fn contains(&self, point: Vec3) -> bool {
        let r_sq = point.x() * point.x() + point.y() * point.y();
        point.z().abs() <= self.dz && r_sq <= self.rmax * self.rmax && r_sq >= self.rmin * self.rmin
    }

    fn time_from_inside(
        &self,
        traj: &Trajectory,
        _max_time: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<f64, BoundaryError> {
        let mut best = None;
        for face in [self.dz, -self.dz] {
            let roots = BoxShape::plane_roots(traj, 2, face, on_boundary, tol);
            best = keep_smallest(best, select_root(&roots, on_boundary, tol, |_| true)?);
        }
        let outer = Self::radial_roots(traj, self.rmax, on_boundary, tol)?;
        best = keep_smallest(best, select_root(&outer, on_boundary, tol, |_| true)?);
        if self.has_inner() {
            let inner = Self::radial_roots(traj, self.rmin, on_boundary, tol)?;
            best = keep_smallest(best, select_root(&inner, on_boundary, tol, |_| true)?);
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
        if bounding_box_entry(&self.bounding_box(), traj, max_time, on_boundary, tol)?.is_none() {
            return Ok(f64::INFINITY);
        }
        let on_annulus = |t: f64| {
            let r = Self::radius_at(traj, t);
            r >= self.rmin - tol.surface && r <= self.rmax + tol.surface
        };
        let within_length = |t: f64| traj.position_at(t).z().abs() <= self.dz + tol.surface;

        let mut best = None;
        for face in [self.dz, -self.dz] {
            let roots = BoxShape::plane_roots(traj, 2, face, on_boundary, tol);
            best = keep_smallest(best, select_root(&roots, on_boundary, tol, on_annulus)?);
        }
        let outer = Self::radial_roots(traj, self.rmax, on_boundary, tol)?;
        best = keep_smallest(best, select_root(&outer, on_boundary, tol, within_length)?);
        if self.has_inner() {
            let inner = Self::radial_roots(traj, self.rmin, on_boundary, tol)?;
            best = keep_smallest(best, select_root(&inner, on_boundary, tol, within_length)?);
        }
        Ok(best.filter(|t| *t <= max_time).unwrap_or(f64::INFINITY))
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        let radial = Vec3::new(point.x(), point.y(), 0.0).normalize();
        let radial = if radial.is_zero() { Vec3::UNIT_X } else { radial };
        match self.nearest_surface(point).0 {
            Surface::Cap => {
                if point.z() < 0.0 {
                    -Vec3::UNIT_Z
                } else {
                    Vec3::UNIT_Z
                }
            }
            Surface::Outer => radial,
            Surface::Inner => -radial,
        }
    }

    fn surface_distance(&self, point: Vec3) -> f64 {
        self.nearest_surface(point).1
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(self.rmax, self.rmax, self.dz))
    }
}

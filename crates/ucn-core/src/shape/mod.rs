// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Solid shapes and their time-to-boundary functions along a parabola.
//!
//! Every shape is expressed in its own local frame. Callers transform the
//! trajectory into that frame first (see [`Trajectory::to_local`]); all
//! times are in seconds from the trajectory's origin.
//!
//! # Boundary-tolerance rule
//!
//! When the caller is sitting on *some* boundary (`on_boundary`), any root
//! of a surface equation with `|t| < suspect_root` is taken to be the
//! surface already underfoot and is snapped to zero, which excludes it from
//! being chosen as the next crossing. Two or more such roots in the same
//! equation cannot be told apart and fail with
//! [`BoundaryError::AmbiguousRoots`].

mod box_shape;
mod composite;
mod tube;

pub use box_shape::BoxShape;
pub use composite::{BoolOp, Composite, Part};
pub use tube::Tube;

use thiserror::Error;

use crate::math::{Aabb, Vec3};
use crate::parabola::Trajectory;
use crate::poly::{Roots, SolverError};
use crate::tolerance::Tolerances;

/// Invalid shape parameters, reported at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// A dimension that must be finite and strictly positive was not.
    #[error("{what} must be finite and positive, got {value}")]
    NonPositive {
        /// Which dimension.
        what: &'static str,
        /// The offending value.
        value: f64,
    },
    /// Tube inner radius is negative, non-finite, or not below the outer radius.
    #[error("tube radii invalid: rmin {rmin} must satisfy 0 <= rmin < rmax ({rmax})")]
    InvalidRadii {
        /// Inner radius.
        rmin: f64,
        /// Outer radius.
        rmax: f64,
    },
    /// A composite part placement contains non-finite values.
    #[error("composite part placement is not finite")]
    NonFinitePlacement,
    /// An intersection of parts whose bounds never overlap.
    #[error("intersection of disjoint parts is empty")]
    EmptyComposite,
}

/// Failure to determine a boundary crossing time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundaryError {
    /// More than one root of a single surface equation sat within the
    /// suspect-root tolerance of zero.
    #[error("{count} roots within the on-boundary tolerance of t = 0")]
    AmbiguousRoots {
        /// Number of near-zero roots.
        count: usize,
    },
    /// No crossing was found from inside a closed shape.
    #[error("no exit found from inside shape")]
    NoExit,
    /// The composite crossing search did not settle.
    #[error("composite crossing search exceeded {0} part crossings")]
    CompositeUnresolved(usize),
    /// The polynomial solver failed.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Containment and time-to-boundary queries shared by every shape.
pub trait BoundaryTime {
    /// Returns `true` when the local point lies inside or on the shape.
    fn contains(&self, point: Vec3) -> bool;

    /// Time until the trajectory, starting inside, first leaves the shape.
    ///
    /// The exit time is always reported, even beyond `max_time`: a closed
    /// shape with no exit signals a malformed shape or field and fails with
    /// [`BoundaryError::NoExit`].
    fn time_from_inside(
        &self,
        traj: &Trajectory,
        max_time: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<f64, BoundaryError>;

    /// Time until the trajectory, starting outside, first enters the shape.
    ///
    /// Returns `f64::INFINITY` when there is no entry within `max_time`.
    fn time_from_outside(
        &self,
        traj: &Trajectory,
        max_time: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<f64, BoundaryError>;

    /// Outward unit normal of the surface nearest to `point`.
    fn normal(&self, point: Vec3) -> Vec3;

    /// Unsigned distance from `point` to the nearest surface.
    ///
    /// Exact near the surface; callers only use it to pick which surface a
    /// point sits on.
    fn surface_distance(&self, point: Vec3) -> f64;

    /// Local-frame bounding box.
    fn bounding_box(&self) -> Aabb;
}

/// A shape in the volume tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned box centred on the origin.
    Box(BoxShape),
    /// Cylinder or cylindrical shell along the local z axis.
    Tube(Tube),
    /// Boolean combination of two placed shapes.
    Composite(Composite),
}

impl Shape {
    /// Box with the given half-extents.
    pub fn cuboid(dx: f64, dy: f64, dz: f64) -> Result<Self, ShapeError> {
        BoxShape::new(dx, dy, dz).map(Self::Box)
    }

    /// Tube with inner radius `rmin` (0 for a solid cylinder), outer radius
    /// `rmax`, and half-length `dz`.
    pub fn tube(rmin: f64, rmax: f64, dz: f64) -> Result<Self, ShapeError> {
        Tube::new(rmin, rmax, dz).map(Self::Tube)
    }

    /// Boolean combination of two placed shapes.
    pub fn composite(op: BoolOp, left: Part, right: Part) -> Result<Self, ShapeError> {
        Composite::new(op, left, right).map(Self::Composite)
    }

    /// Short kind label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Box(_) => "box",
            Self::Tube(_) => "tube",
            Self::Composite(_) => "composite",
        }
    }

    fn as_dyn(&self) -> &dyn BoundaryTime {
        match self {
            Self::Box(s) => s,
            Self::Tube(s) => s,
            Self::Composite(s) => s,
        }
    }
}

impl BoundaryTime for Shape {
    fn contains(&self, point: Vec3) -> bool {
        self.as_dyn().contains(point)
    }

    fn time_from_inside(
        &self,
        traj: &Trajectory,
        max_time: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<f64, BoundaryError> {
        self.as_dyn().time_from_inside(traj, max_time, on_boundary, tol)
    }

    fn time_from_outside(
        &self,
        traj: &Trajectory,
        max_time: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<f64, BoundaryError> {
        self.as_dyn().time_from_outside(traj, max_time, on_boundary, tol)
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        self.as_dyn().normal(point)
    }

    fn surface_distance(&self, point: Vec3) -> f64 {
        self.as_dyn().surface_distance(point)
    }

    fn bounding_box(&self) -> Aabb {
        self.as_dyn().bounding_box()
    }
}

/// Zeroes coefficients that are within `tol` of zero so the solver drops to
/// the true order of the equation.
pub(crate) fn snap_coefficients<const N: usize>(coefficients: &mut [f64; N], tol: f64) {
    for c in coefficients.iter_mut() {
        if c.abs() < tol {
            *c = 0.0;
        }
    }
}

/// Picks the smallest strictly positive root accepted by `accept`, applying
/// the on-boundary suspect-root rule.
pub(crate) fn select_root(
    roots: &Roots,
    on_boundary: bool,
    tol: &Tolerances,
    accept: impl Fn(f64) -> bool,
) -> Result<Option<f64>, BoundaryError> {
    let mut suspects = 0;
    let mut best: Option<f64> = None;
    for raw in roots.iter() {
        let root = if on_boundary && raw.abs() < tol.suspect_root {
            suspects += 1;
            0.0
        } else {
            raw
        };
        if root > 0.0 && best.is_none_or(|b| root < b) && accept(root) {
            best = Some(root);
        }
    }
    if suspects >= 2 {
        return Err(BoundaryError::AmbiguousRoots { count: suspects });
    }
    Ok(best)
}

/// Folds an optional candidate into a running minimum.
pub(crate) fn keep_smallest(best: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (best, candidate) {
        (Some(b), Some(c)) => Some(b.min(c)),
        (b, c) => b.or(c),
    }
}

/// Entry time into an axis-aligned bounding box, used as a cheap reject
/// before the exact surface solve. `None` when the box is not reached.
pub(crate) fn bounding_box_entry(
    aabb: &Aabb,
    traj: &Trajectory,
    max_time: f64,
    on_boundary: bool,
    tol: &Tolerances,
) -> Result<Option<f64>, BoundaryError> {
    let centred = Trajectory::new(traj.point - aabb.center(), traj.velocity, traj.accel);
    let half = aabb.half_extents();
    let bbox = BoxShape::from_half_extents(half);
    if bbox.contains(centred.point) {
        return Ok(Some(0.0));
    }
    let t = bbox.time_from_outside(&centred, max_time + tol.surface, on_boundary, tol)?;
    Ok(t.is_finite().then_some(t))
}

/// Time for the trajectory to move roughly `distance` metres from its
/// origin; used to probe which side of a surface the motion heads into.
pub(crate) fn probe_time(traj: &Trajectory, distance: f64) -> f64 {
    let speed = traj.velocity.length();
    let accel = traj.accel.length();
    if speed > 0.0 {
        distance / speed
    } else if accel > 0.0 {
        (2.0 * distance / accel).sqrt()
    } else {
        0.0
    }
}

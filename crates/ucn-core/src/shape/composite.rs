// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Boolean solids built from two placed shapes.
//!
//! Crossing times are found by marching: advance to the nearest crossing of
//! either part surface, re-test composite containment just past it, and
//! repeat until the composite state flips. Part crossings that leave the
//! composite state unchanged (for example leaving one half of a union while
//! still inside the other) are stepped over.

use crate::math::{Aabb, Transform, Vec3};
use crate::parabola::Trajectory;
use crate::shape::{
    bounding_box_entry, probe_time, BoundaryError, BoundaryTime, Shape, ShapeError,
};
use crate::tolerance::Tolerances;

/// Upper bound on part-surface crossings examined per query.
const MAX_CROSSINGS: usize = 32;

/// Boolean operator combining the two parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoolOp {
    /// Inside either part.
    Union,
    /// Inside both parts.
    Intersection,
    /// Inside the left part and outside the right.
    Subtraction,
}

/// A shape placed in the composite's frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    shape: Box<Shape>,
    placement: Transform,
}

impl Part {
    /// Places `shape` with the given local-to-composite transform.
    pub fn new(shape: Shape, placement: Transform) -> Self {
        Self { shape: Box::new(shape), placement }
    }

    /// The part's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Local-to-composite placement.
    pub fn placement(&self) -> Transform {
        self.placement
    }

    fn contains(&self, point: Vec3) -> bool {
        self.shape.contains(self.placement.point_to_local(point))
    }

    /// Next crossing of this part's surface, whichever side the trajectory
    /// is heading into.
    fn next_crossing(
        &self,
        traj: &Trajectory,
        budget: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<f64, BoundaryError> {
        let local = traj.to_local(&self.placement);
        let ahead = local.position_at(probe_time(&local, 10.0 * tol.surface));
        if self.shape.contains(ahead) {
            self.shape.time_from_inside(&local, budget, on_boundary, tol)
        } else {
            self.shape.time_from_outside(&local, budget, on_boundary, tol)
        }
    }
}

/// Boolean combination of two placed shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    op: BoolOp,
    left: Part,
    right: Part,
    bbox: Aabb,
}

impl Composite {
    /// Combines `left` and `right` with `op`.
    ///
    /// Fails when a placement is not finite or when an intersection's parts
    /// have disjoint bounds.
    pub fn new(op: BoolOp, left: Part, right: Part) -> Result<Self, ShapeError> {
        if !(left.placement.is_finite() && right.placement.is_finite()) {
            return Err(ShapeError::NonFinitePlacement);
        }
        let lb = left.shape.bounding_box().transformed(&left.placement);
        let rb = right.shape.bounding_box().transformed(&right.placement);
        let bbox = match op {
            BoolOp::Union => lb.union(&rb),
            BoolOp::Intersection => lb.intersection(&rb).ok_or(ShapeError::EmptyComposite)?,
            BoolOp::Subtraction => lb,
        };
        Ok(Self { op, left, right, bbox })
    }

    /// The boolean operator.
    pub fn op(&self) -> BoolOp {
        self.op
    }

    /// Left operand.
    pub fn left(&self) -> &Part {
        &self.left
    }

    /// Right operand.
    pub fn right(&self) -> &Part {
        &self.right
    }

    /// Marches along part crossings until composite containment equals
    /// `want_inside`. `None` when no qualifying crossing lies within
    /// `max_time`.
    fn march(
        &self,
        traj: &Trajectory,
        max_time: f64,
        on_boundary: bool,
        tol: &Tolerances,
        want_inside: bool,
    ) -> Result<Option<f64>, BoundaryError> {
        let mut elapsed = 0.0;
        let mut cursor = *traj;
        let mut on_b = on_boundary;
        for _ in 0..MAX_CROSSINGS {
            let remaining = max_time - elapsed;
            let next = self
                .left
                .next_crossing(&cursor, remaining, on_b, tol)?
                .min(self.right.next_crossing(&cursor, remaining, on_b, tol)?);
            if !next.is_finite() || next > remaining {
                return Ok(None);
            }
            elapsed += next;
            cursor = cursor.advanced(next);
            on_b = true;
            let ahead = cursor.position_at(probe_time(&cursor, 10.0 * tol.surface));
            if self.contains(ahead) == want_inside {
                return Ok(Some(elapsed));
            }
        }
        Err(BoundaryError::CompositeUnresolved(MAX_CROSSINGS))
    }
}

impl BoundaryTime for Composite {
    fn contains(&self, point: Vec3) -> bool {
        let l = self.left.contains(point);
        let r = self.right.contains(point);
        match self.op {
            BoolOp::Union => l || r,
            BoolOp::Intersection => l && r,
            BoolOp::Subtraction => l && !r,
        }
    }

    fn time_from_inside(
        &self,
        traj: &Trajectory,
        _max_time: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<f64, BoundaryError> {
        self.march(traj, f64::INFINITY, on_boundary, tol, false)?.ok_or(BoundaryError::NoExit)
    }

    fn time_from_outside(
        &self,
        traj: &Trajectory,
        max_time: f64,
        on_boundary: bool,
        tol: &Tolerances,
    ) -> Result<f64, BoundaryError> {
        if bounding_box_entry(&self.bbox, traj, max_time, on_boundary, tol)?.is_none() {
            return Ok(f64::INFINITY);
        }
        Ok(self.march(traj, max_time, on_boundary, tol, true)?.unwrap_or(f64::INFINITY))
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        let lp = self.left.placement.point_to_local(point);
        let rp = self.right.placement.point_to_local(point);
        if self.left.shape.surface_distance(lp) <= self.right.shape.surface_distance(rp) {
            return self.left.placement.direction_to_parent(self.left.shape.normal(lp));
        }
        let n = self.right.placement.direction_to_parent(self.right.shape.normal(rp));
        // The carved-out surface faces into the removed part.
        if self.op == BoolOp::Subtraction {
            -n
        } else {
            n
        }
    }

    fn surface_distance(&self, point: Vec3) -> f64 {
        let l = self.left.shape.surface_distance(self.left.placement.point_to_local(point));
        let r = self.right.shape.surface_distance(self.right.placement.point_to_local(point));
        l.min(r)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

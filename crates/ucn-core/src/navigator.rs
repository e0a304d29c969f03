// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tree navigation along a parabolic trajectory.
//!
//! The [`Navigator`] is a cursor into a [`GeometryTree`]: it holds the index
//! path from the root to the node that currently owns the particle, plus the
//! on-boundary flag that switches shapes into their suspect-root mode.
//!
//! Each [`Navigator::step`] finds the nearest of (exit the current node,
//! enter one of its children), moves the particle there along the parabola,
//! and then checks that the new point is contained *exclusively* by the
//! new cursor node. When floating-point error leaves the point on the wrong
//! side of a shared surface, the point is micro-stepped along the surface
//! normal (oriented with the direction of travel) until it settles, for at
//! most [`Tolerances::max_nudges`] steps.

use thiserror::Error;
use tracing::{debug, trace};

use crate::geometry::{GeometryTree, Location, NodeId};
use crate::math::Vec3;
use crate::parabola::Trajectory;
use crate::shape::{BoundaryError, BoundaryTime};
use crate::tolerance::Tolerances;

/// Per-particle navigation fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    /// A shape could not produce a crossing time.
    #[error("boundary search failed in node {node}: {source}")]
    Boundary {
        /// Node whose shape was queried.
        node: NodeId,
        /// Underlying shape failure.
        #[source]
        source: BoundaryError,
    },
    /// The trajectory left the root volume.
    #[error("particle escaped the world volume")]
    EscapedWorld,
    /// A point handed to [`Navigator::locate`] lies outside the world.
    #[error("point lies outside the world volume")]
    OutsideWorld,
    /// Several siblings claim the same point.
    #[error("overlapping volumes contain the same point: {0:?}")]
    Overlap(Vec<NodeId>),
    /// Micro-stepping did not settle the point in the cursor node.
    #[error("relocation into node {node} failed after {attempts} nudges")]
    RelocationFailed {
        /// Cursor node at the time of failure.
        node: NodeId,
        /// Number of nudges made.
        attempts: usize,
    },
    /// After a crossing the point is in neither the node it left nor the
    /// node it was meant to enter.
    #[error("point lost between node {initial} and node {current}")]
    Misplaced {
        /// Node before the crossing.
        initial: NodeId,
        /// Node after the crossing.
        current: NodeId,
    },
}

/// A boundary crossed during a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Node that owned the particle before the step.
    pub from: NodeId,
    /// Node that owns the particle after relocation.
    pub into: NodeId,
    /// Node whose surface was crossed.
    pub surface: NodeId,
    /// Outward normal of `surface` at the crossing, in the world frame.
    pub normal: Vec3,
    /// `true` when a child was entered, `false` when the current node was
    /// left.
    pub entering: bool,
}

/// Outcome of one navigation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Time advanced (s).
    pub elapsed: f64,
    /// Position after the step.
    pub position: Vec3,
    /// Velocity after the step.
    pub velocity: Vec3,
    /// Crossing at the end of the step, if the step was cut short by one.
    pub crossing: Option<Crossing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Exit,
    Enter(NodeId),
}

enum Placement {
    Settled,
    Nudge,
    Lost,
}

/// Cursor over a geometry tree for one particle.
#[derive(Debug, Clone)]
pub struct Navigator<'g> {
    tree: &'g GeometryTree,
    path: Vec<NodeId>,
    before: Vec<NodeId>,
    on_boundary: bool,
    tolerances: Tolerances,
}

impl<'g> Navigator<'g> {
    /// Cursor at the root, not on a boundary.
    pub fn new(tree: &'g GeometryTree, tolerances: Tolerances) -> Self {
        Self { tree, path: vec![tree.root()], before: Vec::new(), on_boundary: false, tolerances }
    }

    /// Node that currently owns the particle.
    pub fn current(&self) -> NodeId {
        self.path.last().copied().unwrap_or_else(|| self.tree.root())
    }

    /// Ids from the root down to the current node.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Whether the particle is known to sit on a surface.
    pub fn on_boundary(&self) -> bool {
        self.on_boundary
    }

    /// The tree being navigated.
    pub fn tree(&self) -> &'g GeometryTree {
        self.tree
    }

    /// Places the cursor on the deepest node containing `point`.
    pub fn locate(&mut self, point: Vec3) -> Result<NodeId, NavError> {
        match self.tree.locate(point) {
            Location::Unique(node) => {
                self.path = self.tree.path_to(node);
                self.on_boundary = false;
                Ok(node)
            }
            Location::Outside => Err(NavError::OutsideWorld),
            Location::Ambiguous(nodes) => Err(NavError::Overlap(nodes)),
        }
    }

    /// Advances the particle by at most `max_time`, stopping at the first
    /// boundary crossing.
    pub fn step(
        &mut self,
        position: Vec3,
        velocity: Vec3,
        gravity: Vec3,
        max_time: f64,
    ) -> Result<Step, NavError> {
        let world = Trajectory::new(position, velocity, gravity);
        if max_time <= 0.0 {
            return Ok(Step { elapsed: 0.0, position, velocity, crossing: None });
        }
        let current = self.current();
        let (mut t, target) = self.nearest_crossing(current, &world, max_time)?;
        if t > max_time {
            let end = world.advanced(max_time);
            self.on_boundary = false;
            return Ok(Step { elapsed: max_time, position: end.point, velocity: end.velocity, crossing: None });
        }
        if world.arc_length(t) <= self.tolerances.surface {
            t = 0.0;
        }
        let end = world.advanced(t);

        self.before.clone_from(&self.path);
        let surface = match target {
            Target::Exit => {
                if self.path.len() <= 1 {
                    return Err(NavError::EscapedWorld);
                }
                self.path.pop();
                current
            }
            Target::Enter(child) => {
                self.path.push(child);
                child
            }
        };
        self.on_boundary = true;
        let normal = self.world_normal(surface, end.point);
        debug!(
            from = %current,
            surface = %surface,
            entering = matches!(target, Target::Enter(_)),
            t,
            "boundary crossed"
        );
        let point = self.relocate(end.point, end.velocity, current, surface, normal)?;
        Ok(Step {
            elapsed: t,
            position: point,
            velocity: end.velocity,
            crossing: Some(Crossing {
                from: current,
                into: self.current(),
                surface,
                normal,
                entering: matches!(target, Target::Enter(_)),
            }),
        })
    }

    /// Puts the cursor back where it was before `crossing` after the wall
    /// turned the particle around, and settles the reflected point there.
    pub fn return_from_wall(
        &mut self,
        crossing: &Crossing,
        position: Vec3,
        velocity: Vec3,
    ) -> Result<Vec3, NavError> {
        core::mem::swap(&mut self.path, &mut self.before);
        self.on_boundary = true;
        self.relocate(position, velocity, crossing.into, crossing.surface, crossing.normal)
    }

    fn nearest_crossing(
        &self,
        current: NodeId,
        world: &Trajectory,
        max_time: f64,
    ) -> Result<(f64, Target), NavError> {
        let tol = &self.tolerances;
        let node = self.tree.node(current);
        let local = world.to_local(&node.global());
        let t_exit = node
            .shape()
            .time_from_inside(&local, max_time, self.on_boundary, tol)
            .map_err(|source| NavError::Boundary { node: current, source })?;
        let mut best = (t_exit, Target::Exit);
        for &child in node.children() {
            let c = self.tree.node(child);
            let child_traj = local.to_local(&c.local());
            let t = c
                .shape()
                .time_from_outside(&child_traj, best.0.min(max_time), self.on_boundary, tol)
                .map_err(|source| NavError::Boundary { node: child, source })?;
            if t < best.0 {
                best = (t, Target::Enter(child));
            }
        }
        Ok(best)
    }

    fn world_normal(&self, node: NodeId, point: Vec3) -> Vec3 {
        let n = self.tree.node(node);
        let global = n.global();
        global.direction_to_parent(n.shape().normal(global.point_to_local(point)))
    }

    fn relocate(
        &mut self,
        mut point: Vec3,
        velocity: Vec3,
        initial: NodeId,
        crossed: NodeId,
        normal: Vec3,
    ) -> Result<Vec3, NavError> {
        let push = if normal.dot(&velocity) < 0.0 { -normal } else { normal };
        let max_nudges = self.tolerances.max_nudges;
        for attempt in 0..=max_nudges {
            match self.classify(point, initial, crossed) {
                Placement::Settled => return Ok(point),
                Placement::Lost => {
                    return Err(NavError::Misplaced { initial, current: self.current() });
                }
                Placement::Nudge if attempt < max_nudges => {
                    point += push.scale(self.tolerances.nudge);
                    trace!(node = %self.current(), attempt = attempt + 1, "relocation nudge");
                }
                Placement::Nudge => {}
            }
        }
        Err(NavError::RelocationFailed { node: self.current(), attempts: max_nudges })
    }

    fn classify(&mut self, point: Vec3, initial: NodeId, crossed: NodeId) -> Placement {
        let tree = self.tree;
        let current = self.current();
        if tree.contains_exclusive(current, point) {
            return Placement::Settled;
        }
        if tree.contains(current, point) {
            // A child also claims the point. Still inside the node just
            // crossed means the crossing has not fully happened yet.
            let children = tree.node(current).children();
            if children.iter().any(|c| *c == crossed && tree.contains(*c, point)) {
                return Placement::Nudge;
            }
            let Some(child) = children.iter().copied().find(|c| tree.contains(*c, point)) else {
                return Placement::Nudge;
            };
            return match tree.locate_from(child, point) {
                Location::Unique(node) => {
                    debug!(from = %current, into = %node, "descended into neighbour");
                    self.path = tree.path_to(node);
                    Placement::Settled
                }
                Location::Outside | Location::Ambiguous(_) => Placement::Nudge,
            };
        }
        if !tree.contains(initial, point) {
            return Placement::Lost;
        }
        if tree.node(initial).parent() == Some(current) {
            // Left a child but the point is not inside its parent.
            return Placement::Lost;
        }
        Placement::Nudge
    }
}

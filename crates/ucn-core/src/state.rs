// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Particle fate.
//!
//! A particle starts [`ParticleOutcome::Propagating`] and ends in exactly one
//! terminal outcome. Navigation faults do not abort a batch: they are folded
//! into [`ParticleOutcome::Anomalous`] with a reason.

use core::fmt;

use crate::navigator::NavError;
use crate::shape::BoundaryError;

/// Why a particle was classified anomalous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AnomalyReason {
    /// No exit was found from inside a shape.
    NoExit,
    /// Several near-zero roots on one surface.
    AmbiguousRoots,
    /// The polynomial solver failed numerically.
    SolverFailure,
    /// A composite crossing search did not settle.
    CompositeUnresolved,
    /// The particle left the world volume.
    EscapedWorld,
    /// Micro-stepping could not settle the particle.
    RelocationFailed,
    /// The particle ended up in neither the node it left nor the one it entered.
    Misplaced,
    /// Overlapping siblings claimed the same point.
    Overlap,
    /// The start point is not inside a tracking volume.
    StartedOutsideTracking,
    /// The step ceiling was reached.
    StepLimit,
    /// The run ended before any terminal event.
    TimeBudgetExhausted,
}

impl AnomalyReason {
    /// Every reason, in tally order.
    pub const ALL: [Self; 11] = [
        Self::NoExit,
        Self::AmbiguousRoots,
        Self::SolverFailure,
        Self::CompositeUnresolved,
        Self::EscapedWorld,
        Self::RelocationFailed,
        Self::Misplaced,
        Self::Overlap,
        Self::StartedOutsideTracking,
        Self::StepLimit,
        Self::TimeBudgetExhausted,
    ];

    /// Stable snake_case label.
    pub fn label(self) -> &'static str {
        match self {
            Self::NoExit => "no_exit",
            Self::AmbiguousRoots => "ambiguous_roots",
            Self::SolverFailure => "solver_failure",
            Self::CompositeUnresolved => "composite_unresolved",
            Self::EscapedWorld => "escaped_world",
            Self::RelocationFailed => "relocation_failed",
            Self::Misplaced => "misplaced",
            Self::Overlap => "overlap",
            Self::StartedOutsideTracking => "started_outside_tracking",
            Self::StepLimit => "step_limit",
            Self::TimeBudgetExhausted => "time_budget_exhausted",
        }
    }
}

impl From<&NavError> for AnomalyReason {
    fn from(err: &NavError) -> Self {
        match err {
            NavError::Boundary { source, .. } => match source {
                BoundaryError::AmbiguousRoots { .. } => Self::AmbiguousRoots,
                BoundaryError::NoExit => Self::NoExit,
                BoundaryError::CompositeUnresolved(_) => Self::CompositeUnresolved,
                BoundaryError::Solver(_) => Self::SolverFailure,
            },
            NavError::EscapedWorld => Self::EscapedWorld,
            NavError::OutsideWorld => Self::StartedOutsideTracking,
            NavError::Overlap(_) => Self::Overlap,
            NavError::RelocationFailed { .. } => Self::RelocationFailed,
            NavError::Misplaced { .. } => Self::Misplaced,
        }
    }
}

/// Where a particle is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParticleOutcome {
    /// Still moving.
    Propagating,
    /// Beta decayed in flight.
    Decayed,
    /// Absorbed by a wall.
    Absorbed,
    /// Counted by a detector.
    Detected,
    /// Entered a black-hole volume.
    Lost,
    /// Propagation could not continue.
    Anomalous(AnomalyReason),
}

impl ParticleOutcome {
    /// Whether no further physics runs for this particle.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Propagating)
    }

    /// Coarse outcome bucket.
    pub fn kind(self) -> OutcomeKind {
        match self {
            Self::Propagating => OutcomeKind::Propagating,
            Self::Decayed => OutcomeKind::Decayed,
            Self::Absorbed => OutcomeKind::Absorbed,
            Self::Detected => OutcomeKind::Detected,
            Self::Lost => OutcomeKind::Lost,
            Self::Anomalous(_) => OutcomeKind::Anomalous,
        }
    }
}

impl fmt::Display for ParticleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anomalous(reason) => write!(f, "anomalous ({})", reason.label()),
            other => f.write_str(other.kind().label()),
        }
    }
}

/// Outcome without the anomaly reason, for tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OutcomeKind {
    /// See [`ParticleOutcome::Propagating`].
    Propagating,
    /// See [`ParticleOutcome::Decayed`].
    Decayed,
    /// See [`ParticleOutcome::Absorbed`].
    Absorbed,
    /// See [`ParticleOutcome::Detected`].
    Detected,
    /// See [`ParticleOutcome::Lost`].
    Lost,
    /// See [`ParticleOutcome::Anomalous`].
    Anomalous,
}

impl OutcomeKind {
    /// Terminal kinds in tally order.
    pub const TERMINAL: [Self; 5] = [Self::Decayed, Self::Absorbed, Self::Detected, Self::Lost, Self::Anomalous];

    /// Lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Propagating => "propagating",
            Self::Decayed => "decayed",
            Self::Absorbed => "absorbed",
            Self::Detected => "detected",
            Self::Lost => "lost",
            Self::Anomalous => "anomalous",
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! ucn-core: Monte Carlo transport of ultracold neutrons.
//!
//! Particles fly on exact parabolas under gravity. Each step finds the first
//! boundary crossing analytically (polynomial roots up to quartic order),
//! relocates the particle in a tree of nested volumes, and applies wall
//! physics: Fermi-potential reflection, loss per bounce, and the
//! specular/diffuse split. Spin precesses in optional magnetic fields.
//!
//! The core is single-particle and single-threaded. Batches, sources and
//! tallies live in `ucn-run`.
#![forbid(unsafe_code)]

pub mod clock;
pub mod constants;
pub mod field;
pub mod geometry;
pub mod interaction;
pub mod material;
/// Vector, rotation, placement and PRNG primitives.
pub mod math;
pub mod navigator;
pub mod observer;
pub mod parabola;
pub mod particle;
pub mod poly;
pub mod propagate;
pub mod shape;
pub mod spin;
pub mod state;
pub mod tolerance;

pub use clock::SimulationClock;
pub use field::{GravField, MagField, MagFieldSet, UniformMagField};
pub use geometry::{
    GeometryBuilder, GeometryError, GeometryTree, Location, MaterialId, NodeId, Volume,
    VolumeKind,
};
pub use interaction::{interact, Bounce, BounceKind, Interaction};
pub use material::Material;
pub use math::{derive_seed, Aabb, Prng, Quat, Transform, Vec3};
pub use navigator::{Crossing, NavError, Navigator, Step};
pub use observer::{
    BounceCounter, Event, EventContext, NullObserver, Observer, ObserverSet, SpinRecorder,
    SpinSample, TrackPoint, TrackRecorder,
};
pub use parabola::Trajectory;
pub use particle::{Bounces, Particle};
pub use propagate::{propagate, Experiment, Physics, Propagation, DEFAULT_MAX_STEPS};
pub use shape::{BoolOp, BoundaryError, BoundaryTime, BoxShape, Composite, Part, Shape, ShapeError, Tube};
pub use spin::Spin;
pub use state::{AnomalyReason, OutcomeKind, ParticleOutcome};
pub use tolerance::Tolerances;

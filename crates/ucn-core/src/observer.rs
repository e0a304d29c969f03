// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Event hooks fired during propagation.
//!
//! The core never persists anything itself; recorders implement
//! [`Observer`] and decide what to keep. Observers are owned per particle
//! so no synchronisation is involved.

use crate::geometry::NodeId;
use crate::math::Vec3;
use crate::spin::Spin;
use crate::state::ParticleOutcome;

/// Why an event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventContext {
    /// End of a navigation step.
    Step,
    /// Mirror reflection off a wall.
    SpecularBounce,
    /// Diffuse reflection off a wall.
    DiffuseBounce,
    /// Spin sampled on the measurement cadence.
    SpinUpdate,
    /// Magnetic field sampled on the field cadence.
    MagField,
    /// The particle reached its outcome.
    Terminal,
}

/// Snapshot of a particle at an event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// What happened.
    pub context: EventContext,
    /// Particle id.
    pub particle: u64,
    /// Simulation time (s).
    pub time: f64,
    /// World position (m).
    pub position: Vec3,
    /// Velocity (m/s).
    pub velocity: Vec3,
    /// Volume that owns the particle, when known.
    pub node: Option<NodeId>,
    /// Spin, for spin events.
    pub spin: Option<Spin>,
    /// Magnetic field (T), for field and spin events.
    pub field: Option<Vec3>,
    /// Final outcome, for the terminal event.
    pub outcome: Option<ParticleOutcome>,
}

impl Event {
    /// Event with only the kinematic fields set.
    pub fn new(context: EventContext, particle: u64, time: f64, position: Vec3, velocity: Vec3) -> Self {
        Self { context, particle, time, position, velocity, node: None, spin: None, field: None, outcome: None }
    }
}

/// Receives propagation events.
pub trait Observer {
    /// Called for every event.
    fn record(&mut self, event: &Event);
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn record(&mut self, event: &Event) {
        (**self).record(event);
    }
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn record(&mut self, _event: &Event) {}
}

/// Counts wall bounces by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BounceCounter {
    /// Specular bounces seen.
    pub specular: u64,
    /// Diffuse bounces seen.
    pub diffuse: u64,
}

impl Observer for BounceCounter {
    fn record(&mut self, event: &Event) {
        match event.context {
            EventContext::SpecularBounce => self.specular += 1,
            EventContext::DiffuseBounce => self.diffuse += 1,
            _ => {}
        }
    }
}

/// One recorded track point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackPoint {
    /// Simulation time (s).
    pub time: f64,
    /// World position (m).
    pub position: Vec3,
}

/// Records the particle path, up to a fixed number of points.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecorder {
    points: Vec<TrackPoint>,
    capacity: usize,
    dropped: usize,
}

impl TrackRecorder {
    /// Recorder keeping at most `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { points: Vec::with_capacity(capacity.min(4096)), capacity, dropped: 0 }
    }

    /// Recorded points in time order.
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    /// Points that did not fit.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl Observer for TrackRecorder {
    fn record(&mut self, event: &Event) {
        if matches!(event.context, EventContext::SpinUpdate | EventContext::MagField) {
            return;
        }
        if self.points.len() < self.capacity {
            self.points.push(TrackPoint { time: event.time, position: event.position });
        } else {
            self.dropped += 1;
        }
    }
}

/// One spin measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpinSample {
    /// Simulation time (s).
    pub time: f64,
    /// Bloch vector.
    pub bloch: Vec3,
    /// Probability of spin up along the recorder's axis.
    pub probability_up: f64,
}

/// Records the spin on every spin update.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinRecorder {
    axis: Vec3,
    samples: Vec<SpinSample>,
}

impl SpinRecorder {
    /// Recorder projecting onto `axis`.
    pub fn new(axis: Vec3) -> Self {
        Self { axis, samples: Vec::new() }
    }

    /// Samples in time order.
    pub fn samples(&self) -> &[SpinSample] {
        &self.samples
    }
}

impl Observer for SpinRecorder {
    fn record(&mut self, event: &Event) {
        if event.context != EventContext::SpinUpdate {
            return;
        }
        if let Some(spin) = event.spin {
            self.samples.push(SpinSample {
                time: event.time,
                bloch: spin.bloch(),
                probability_up: spin.probability_up(self.axis),
            });
        }
    }
}

/// Fans events out to several observers.
#[derive(Default)]
pub struct ObserverSet<'a> {
    observers: Vec<&'a mut dyn Observer>,
}

impl<'a> ObserverSet<'a> {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer.
    pub fn push(&mut self, observer: &'a mut dyn Observer) {
        self.observers.push(observer);
    }
}

impl core::fmt::Debug for ObserverSet<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObserverSet").field("observers", &self.observers.len()).finish()
    }
}

impl Observer for ObserverSet<'_> {
    fn record(&mut self, event: &Event) {
        for observer in &mut self.observers {
            observer.record(event);
        }
    }
}

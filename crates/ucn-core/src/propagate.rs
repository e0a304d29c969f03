// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The per-particle driver.
//!
//! [`propagate`] runs one particle from its start state to a terminal
//! [`ParticleOutcome`]. Each iteration:
//!
//! 1. checks for decay (before any geometry work);
//! 2. asks the clock for the step budget and clamps it to the decay time;
//! 3. lets the [`Navigator`] move the particle to the next crossing or the
//!    end of the budget;
//! 4. precesses the spin with the field sampled at the step midpoint;
//! 5. applies wall physics if a boundary was crossed.
//!
//! Navigation faults end the particle as [`ParticleOutcome::Anomalous`];
//! they never propagate out as errors.

use tracing::{debug, trace, warn};

use crate::clock::SimulationClock;
use crate::constants::NEUTRON_LIFETIME;
use crate::field::{GravField, MagFieldSet};
use crate::geometry::{GeometryTree, VolumeKind};
use crate::interaction::{interact, BounceKind, Interaction};
use crate::math::Prng;
use crate::navigator::{NavError, Navigator};
use crate::observer::{Event, EventContext, Observer};
use crate::parabola::Trajectory;
use crate::particle::Particle;
use crate::state::{AnomalyReason, ParticleOutcome};
use crate::tolerance::Tolerances;

/// Default ceiling on navigation steps per particle.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// The static apparatus: geometry plus fields. Shared read-only by every
/// particle in a run.
#[derive(Debug)]
pub struct Experiment {
    /// Volume tree.
    pub geometry: GeometryTree,
    /// Uniform acceleration on the trajectory.
    pub gravity: GravField,
    /// Magnetic sources for spin precession.
    pub mag_fields: MagFieldSet,
}

impl Experiment {
    /// Geometry under standard gravity with no magnetic field.
    pub fn new(geometry: GeometryTree) -> Self {
        Self { geometry, gravity: GravField::standard(), mag_fields: MagFieldSet::new() }
    }

    /// Replaces the gravity field.
    pub fn with_gravity(mut self, gravity: GravField) -> Self {
        self.gravity = gravity;
        self
    }

    /// Replaces the magnetic sources.
    pub fn with_mag_fields(mut self, mag_fields: MagFieldSet) -> Self {
        self.mag_fields = mag_fields;
        self
    }
}

/// Physics toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Physics {
    /// Absorption at walls.
    pub wall_losses: bool,
    /// Beta decay in flight.
    pub decay: bool,
}

impl Default for Physics {
    fn default() -> Self {
        Self { wall_losses: true, decay: true }
    }
}

/// Per-run propagation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Propagation {
    /// Run end and sampling cadence.
    pub clock: SimulationClock,
    /// Boundary and relocation tolerances.
    pub tolerances: Tolerances,
    /// Physics toggles.
    pub physics: Physics,
    /// Step ceiling per particle.
    pub max_steps: u64,
}

impl Default for Propagation {
    fn default() -> Self {
        Self {
            clock: SimulationClock::default(),
            tolerances: Tolerances::default(),
            physics: Physics::default(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Runs `particle` to a terminal outcome, which is also stored in
/// `particle.outcome`.
pub fn propagate(
    particle: &mut Particle,
    experiment: &Experiment,
    propagation: &Propagation,
    observer: &mut dyn Observer,
) -> ParticleOutcome {
    let mut run = Run {
        experiment,
        propagation,
        rng: Prng::from_seed_u64(particle.seed),
        navigator: Navigator::new(&experiment.geometry, propagation.tolerances),
    };
    let outcome =
        if particle.outcome.is_terminal() { particle.outcome } else { run.drive(particle, observer) };
    if let ParticleOutcome::Anomalous(reason) = outcome {
        warn!(
            particle = particle.id,
            seed = particle.seed,
            reason = reason.label(),
            time = particle.time,
            "particle anomalous"
        );
    }
    particle.outcome = outcome;
    let mut event = Event::new(
        EventContext::Terminal,
        particle.id,
        particle.time,
        particle.position,
        particle.velocity,
    );
    event.node = Some(run.navigator.current());
    event.outcome = Some(outcome);
    observer.record(&event);
    outcome
}

struct Run<'a> {
    experiment: &'a Experiment,
    propagation: &'a Propagation,
    rng: Prng,
    navigator: Navigator<'a>,
}

impl Run<'_> {
    fn drive(&mut self, particle: &mut Particle, observer: &mut dyn Observer) -> ParticleOutcome {
        let propagation = self.propagation;
        let clock = &propagation.clock;
        let decay_at = if propagation.physics.decay {
            particle.time - NEUTRON_LIFETIME * self.rng.next_open_f64().ln()
        } else {
            f64::INFINITY
        };

        match self.navigator.locate(particle.position) {
            Ok(node) if self.experiment.geometry.node(node).kind() == VolumeKind::Tracking => {}
            Ok(_) => return ParticleOutcome::Anomalous(AnomalyReason::StartedOutsideTracking),
            Err(err) => return anomalous(&err),
        }

        for _ in 0..propagation.max_steps {
            if particle.time >= decay_at {
                return ParticleOutcome::Decayed;
            }
            let budget = clock.time_to_next_event(particle.time);
            if budget <= 0.0 {
                return ParticleOutcome::Anomalous(AnomalyReason::TimeBudgetExhausted);
            }
            let budget = budget.min(decay_at - particle.time);
            if let Some(outcome) = self.step(particle, budget, observer) {
                return outcome;
            }
        }
        ParticleOutcome::Anomalous(AnomalyReason::StepLimit)
    }

    /// One navigation step plus its consequences; `Some` when terminal.
    fn step(
        &mut self,
        particle: &mut Particle,
        budget: f64,
        observer: &mut dyn Observer,
    ) -> Option<ParticleOutcome> {
        let gravity = self.experiment.gravity.accel();
        let start = Trajectory::new(particle.position, particle.velocity, gravity);
        let t0 = particle.time;
        let step = match self.navigator.step(particle.position, particle.velocity, gravity, budget) {
            Ok(step) => step,
            Err(err) => return Some(anomalous(&err)),
        };
        particle.distance += start.arc_length(step.elapsed);
        particle.position = step.position;
        particle.velocity = step.velocity;
        particle.time = t0 + step.elapsed;
        self.precess(particle, &start, t0, step.elapsed, observer);
        self.emit(EventContext::Step, particle, observer);
        trace!(particle = particle.id, t = particle.time, node = %self.navigator.current(), "step");

        let crossing = step.crossing?;
        let tree = &self.experiment.geometry;
        let interaction = interact(
            tree.node(crossing.into).kind(),
            tree.material_of(crossing.into),
            particle.velocity,
            crossing.normal,
            self.propagation.physics.wall_losses,
            &mut self.rng,
        );
        match interaction {
            Interaction::Continue => None,
            Interaction::Terminal(outcome) => Some(outcome),
            Interaction::Reflected(bounce) => {
                particle.velocity = bounce.velocity;
                let context = match bounce.kind {
                    BounceKind::Specular => {
                        particle.bounces.specular += 1;
                        EventContext::SpecularBounce
                    }
                    BounceKind::Diffuse => {
                        particle.bounces.diffuse += 1;
                        EventContext::DiffuseBounce
                    }
                };
                match self.navigator.return_from_wall(&crossing, particle.position, particle.velocity) {
                    Ok(point) => particle.position = point,
                    Err(err) => return Some(anomalous(&err)),
                }
                self.emit(context, particle, observer);
                None
            }
        }
    }

    fn precess(
        &self,
        particle: &mut Particle,
        start: &Trajectory,
        t0: f64,
        elapsed: f64,
        observer: &mut dyn Observer,
    ) {
        let fields = &self.experiment.mag_fields;
        let clock = &self.propagation.clock;
        if fields.is_empty() {
            return;
        }
        if elapsed > 0.0 {
            let half = 0.5 * elapsed;
            let b = fields.field_at(start.position_at(half), t0 + half);
            particle.spin.precess(b, elapsed);
        }
        if clock.spin_due(particle.time) || clock.field_due(particle.time) {
            let b = fields.field_at(particle.position, particle.time);
            if clock.spin_due(particle.time) {
                let mut event = self.event(EventContext::SpinUpdate, particle);
                event.spin = Some(particle.spin);
                event.field = Some(b);
                observer.record(&event);
            }
            if clock.field_due(particle.time) {
                let mut event = self.event(EventContext::MagField, particle);
                event.field = Some(b);
                observer.record(&event);
            }
        }
    }

    fn event(&self, context: EventContext, particle: &Particle) -> Event {
        let mut event = Event::new(context, particle.id, particle.time, particle.position, particle.velocity);
        event.node = Some(self.navigator.current());
        event
    }

    fn emit(&self, context: EventContext, particle: &Particle, observer: &mut dyn Observer) {
        let clock = &self.propagation.clock;
        if context == EventContext::Step && clock.track_interval > 0.0 && !clock.track_due(particle.time) {
            return;
        }
        observer.record(&self.event(context, particle));
    }
}

fn anomalous(err: &NavError) -> ParticleOutcome {
    debug!(error = %err, "navigation fault");
    ParticleOutcome::Anomalous(AnomalyReason::from(err))
}

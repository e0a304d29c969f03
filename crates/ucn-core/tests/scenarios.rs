// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
mod common;

use approx::assert_relative_eq;
use ucn_core::constants::STANDARD_GRAVITY;
use ucn_core::{
    propagate, AnomalyReason, BoundaryTime, EventContext, Experiment, GravField, Navigator,
    Particle, ParticleOutcome, Physics, Propagation, Shape, SimulationClock, Tolerances,
    Trajectory, Vec3, VolumeKind,
};

use common::{boxed_cell, mirror, mirror_tube, EventLog};

#[test]
fn box_exit_through_plus_x_face() {
    let (tree, cell) = boxed_cell(Vec3::new(1.0, 1.0, 1.0), VolumeKind::Boundary, mirror());
    let mut nav = Navigator::new(&tree, Tolerances::default());
    assert_eq!(nav.locate(Vec3::ZERO).expect("locate"), cell);

    let step = nav.step(Vec3::ZERO, Vec3::UNIT_X, Vec3::ZERO, 10.0).expect("step");
    let crossing = step.crossing.expect("crossing");
    assert_relative_eq!(step.elapsed, 1.0, max_relative = 1e-12);
    assert_relative_eq!(step.position.x(), 1.0, max_relative = 1e-9);
    assert_eq!(crossing.from, cell);
    assert_eq!(crossing.into, tree.root());
    assert_relative_eq!(crossing.normal.x(), 1.0);
}

#[test]
fn tube_exit_through_end_cap_not_radial_surface() {
    let tube = Shape::tube(0.0, 1.0, 2.0).expect("tube");
    let traj = Trajectory::new(Vec3::ZERO, Vec3::UNIT_Z, Vec3::ZERO);
    let t = tube
        .time_from_inside(&traj, 10.0, false, &Tolerances::default())
        .expect("exit");
    assert_relative_eq!(t, 2.0, max_relative = 1e-12);
    let n = tube.normal(traj.position_at(t));
    assert_relative_eq!(n.z(), 1.0);
    assert_relative_eq!(n.x(), 0.0);
}

#[test]
fn dropped_particle_bounces_back_to_its_height() {
    let (tree, _) = mirror_tube();
    let experiment = Experiment::new(tree).with_gravity(GravField::standard());
    let start = Vec3::new(0.0, 0.0, 0.5);
    let drop = 1.5;
    let fall = (2.0 * drop / STANDARD_GRAVITY).sqrt();
    let impact = (2.0 * STANDARD_GRAVITY * drop).sqrt();
    let propagation = Propagation {
        clock: SimulationClock::new(2.0 * fall, 10.0),
        physics: Physics { wall_losses: false, decay: false },
        ..Propagation::default()
    };

    let mut particle = Particle::new(0, start, Vec3::ZERO, 42);
    let mut log = EventLog::default();
    let outcome = propagate(&mut particle, &experiment, &propagation, &mut log);

    assert_eq!(outcome, ParticleOutcome::Anomalous(AnomalyReason::TimeBudgetExhausted));
    assert_eq!(particle.bounces.specular, 1);
    let bounce = log
        .events
        .iter()
        .find(|e| e.context == EventContext::SpecularBounce)
        .expect("bounce event");
    assert_relative_eq!(bounce.velocity.z(), impact, max_relative = 1e-9);
    assert_relative_eq!(bounce.time, fall, max_relative = 1e-9);
    assert_relative_eq!(particle.position.z(), start.z(), epsilon = 1e-6);
    assert!(particle.velocity.length() < 1e-6);
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
// criterion_group!/criterion_main! expand to undocumented functions that cannot
// carry #[allow] (attributes on macro invocations are ignored). Crate-level
// suppress is required for benchmark binaries using Criterion.
#![allow(missing_docs)]
//! Exit and entry times of a parabolic path for each shape kind.
//!
//! # Running
//!
//! ```sh
//! cargo bench --package ucn-benches --bench boundary_time
//! ```
//!
//! # What This Measures
//!
//! - `inside/<shape>`: time to leave the shape from its centre
//! - `outside/<shape>`: time to reach the shape from two metres away
//! - `composite` marches through both parts, so expect it to dominate
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ucn_core::constants::STANDARD_GRAVITY;
use ucn_core::{BoolOp, BoundaryTime, Part, Shape, Tolerances, Trajectory, Transform, Vec3};

fn shapes() -> Vec<(&'static str, Shape)> {
    let cuboid = Shape::cuboid(0.5, 0.5, 0.5).expect("box");
    let tube = Shape::tube(0.1, 0.5, 0.5).expect("tube");
    let pillar = Shape::composite(
        BoolOp::Subtraction,
        Part::new(cuboid.clone(), Transform::default()),
        Part::new(
            Shape::tube(0.0, 0.1, 0.75).expect("pillar"),
            Transform::from_translation(Vec3::new(0.2, 0.0, 0.0)),
        ),
    )
    .expect("composite");
    vec![("box", cuboid), ("tube", tube), ("composite", pillar)]
}

fn bench_boundary_time(c: &mut Criterion) {
    let tol = Tolerances::default();
    let accel = Vec3::new(0.0, 0.0, -STANDARD_GRAVITY);
    let shapes = shapes();

    let mut inside = c.benchmark_group("inside");
    let from_centre = Trajectory::new(Vec3::new(0.0, 0.3, 0.0), Vec3::new(3.0, 1.0, 2.0), accel);
    for (name, shape) in &shapes {
        inside.bench_with_input(BenchmarkId::from_parameter(name), shape, |b, shape| {
            b.iter(|| shape.time_from_inside(black_box(&from_centre), 10.0, false, &tol));
        });
    }
    inside.finish();

    let mut outside = c.benchmark_group("outside");
    let approaching = Trajectory::new(Vec3::new(-2.0, 0.3, 0.0), Vec3::new(4.0, 0.0, 2.0), accel);
    for (name, shape) in &shapes {
        outside.bench_with_input(BenchmarkId::from_parameter(name), shape, |b, shape| {
            b.iter(|| shape.time_from_outside(black_box(&approaching), 10.0, false, &tol));
        });
    }
    outside.finish();
}

criterion_group!(benches, bench_boundary_time);
criterion_main!(benches);

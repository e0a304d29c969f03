// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! A small storage experiment used by the CLI, benches, and tests.
//!
//! A vertical stainless-steel bottle (tube, radius 0.3 m, height 1 m) with a
//! detector window under its floor and a pump port above its lid. The
//! default [`crate::SourceConfig`] fills the middle of the bottle.

use ucn_core::{
    Experiment, GeometryBuilder, GeometryError, Material, Shape, Transform, Vec3, Volume,
    VolumeKind,
};

/// Detection probability of the demo detector window.
pub const DETECTOR_EFFICIENCY: f64 = 0.8;

/// Stainless steel: V_F ≈ 188 neV, small loss, a little roughness.
pub fn stainless_steel() -> Material {
    Material::new("stainless steel", 188e-9, 1.0e-4, 0.05)
}

/// The demo apparatus under standard gravity.
pub fn storage_bottle() -> Result<Experiment, GeometryError> {
    let mut b = GeometryBuilder::new();
    let steel = b.add_material(stainless_steel())?;
    let window = b.add_material(Material::new("aluminium window", 54e-9, 2.0e-4, 0.0))?;
    let vacuum = b.add_material(Material::vacuum())?;

    let world = b.set_root(Volume::new(
        "shell",
        Shape::cuboid(0.4, 0.4, 0.6)?,
        VolumeKind::Boundary,
        steel,
    ))?;
    b.add_child(
        world,
        Volume::new(
            "bottle",
            Shape::tube(0.0, 0.3, 0.5)?,
            VolumeKind::Tracking,
            vacuum,
        ),
    )?;
    b.add_child(
        world,
        Volume::new(
            "detector",
            Shape::cuboid(0.1, 0.1, 0.05)?,
            VolumeKind::Detector { efficiency: DETECTOR_EFFICIENCY },
            window,
        )
        .placed(Transform::from_translation(Vec3::new(0.0, 0.0, -0.55))),
    )?;
    b.add_child(
        world,
        Volume::new(
            "pump port",
            Shape::cuboid(0.05, 0.05, 0.05)?,
            VolumeKind::BlackHole,
            vacuum,
        )
        .placed(Transform::from_translation(Vec3::new(0.0, 0.0, 0.55))),
    )?;
    Ok(Experiment::new(b.build()?))
}

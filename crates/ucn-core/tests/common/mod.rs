// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use ucn_core::{
    Event, EventContext, GeometryBuilder, GeometryTree, Material, NodeId, Observer, Shape,
    Transform, Vec3, Volume, VolumeKind,
};

/// Fermi potential high enough to reflect every test particle (eV).
pub const MIRROR_POTENTIAL: f64 = 350e-9;

/// Lossless, smooth wall.
pub fn mirror() -> Material {
    Material::new("mirror", MIRROR_POTENTIAL, 0.0, 0.0)
}

/// A tracking box of half-extent `half` inside a world volume of kind
/// `world_kind` that is one metre larger on every side.
pub fn boxed_cell(half: Vec3, world_kind: VolumeKind, wall: Material) -> (GeometryTree, NodeId) {
    let mut b = GeometryBuilder::new();
    let wall = b.add_material(wall).expect("wall material");
    let vac = b.add_material(Material::vacuum()).expect("vacuum");
    let outer = half + Vec3::new(1.0, 1.0, 1.0);
    let root = b
        .set_root(Volume::new(
            "world",
            Shape::cuboid(outer.x(), outer.y(), outer.z()).expect("world shape"),
            world_kind,
            wall,
        ))
        .expect("root");
    let cell = b
        .add_child(
            root,
            Volume::new(
                "cell",
                Shape::cuboid(half.x(), half.y(), half.z()).expect("cell shape"),
                VolumeKind::Tracking,
                vac,
            ),
        )
        .expect("cell");
    (b.build().expect("tree"), cell)
}

/// A vertical tube (radius 0.5, half-length 1) of vacuum inside a mirror
/// box.
pub fn mirror_tube() -> (GeometryTree, NodeId) {
    let mut b = GeometryBuilder::new();
    let wall = b.add_material(mirror()).expect("wall material");
    let vac = b.add_material(Material::vacuum()).expect("vacuum");
    let root = b
        .set_root(Volume::new(
            "world",
            Shape::cuboid(1.0, 1.0, 2.0).expect("world shape"),
            VolumeKind::Boundary,
            wall,
        ))
        .expect("root");
    let tube = b
        .add_child(
            root,
            Volume::new(
                "guide",
                Shape::tube(0.0, 0.5, 1.0).expect("tube shape"),
                VolumeKind::Tracking,
                vac,
            ),
        )
        .expect("tube");
    (b.build().expect("tree"), tube)
}

/// Two touching tracking cells split at x = 0 inside a mirror box, with a
/// detector patch set into the right cell's far wall.
pub fn split_cells_with_detector(efficiency: f64) -> GeometryTree {
    let mut b = GeometryBuilder::new();
    let wall = b.add_material(mirror()).expect("wall material");
    let vac = b.add_material(Material::vacuum()).expect("vacuum");
    let root = b
        .set_root(Volume::new(
            "world",
            Shape::cuboid(2.0, 2.0, 2.0).expect("world shape"),
            VolumeKind::Boundary,
            wall,
        ))
        .expect("root");
    let cell = || Shape::cuboid(0.5, 1.0, 1.0).expect("cell shape");
    b.add_child(
        root,
        Volume::new("left", cell(), VolumeKind::Tracking, vac)
            .placed(Transform::from_translation(Vec3::new(-0.5, 0.0, 0.0))),
    )
    .expect("left");
    b.add_child(
        root,
        Volume::new("right", cell(), VolumeKind::Tracking, vac)
            .placed(Transform::from_translation(Vec3::new(0.5, 0.0, 0.0))),
    )
    .expect("right");
    b.add_child(
        root,
        Volume::new(
            "detector",
            Shape::cuboid(0.25, 0.5, 0.5).expect("detector shape"),
            VolumeKind::Detector { efficiency },
            wall,
        )
        .placed(Transform::from_translation(Vec3::new(1.25, 0.0, 0.0))),
    )
    .expect("detector");
    b.build().expect("tree")
}

/// Keeps every event.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl EventLog {
    pub fn count(&self, context: EventContext) -> usize {
        self.events.iter().filter(|e| e.context == context).count()
    }
}

impl Observer for EventLog {
    fn record(&mut self, event: &Event) {
        self.events.push(*event);
    }
}

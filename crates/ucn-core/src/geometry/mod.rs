// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Immutable volume hierarchy.
//!
//! Volumes live in an arena ([`GeometryTree`]) and refer to each other by
//! [`NodeId`]. The tree is assembled once with [`GeometryBuilder`] and is
//! read-only (and `Sync`) afterwards, so any number of particles can share
//! it across threads.
//!
//! Containment is *exclusive*: a point belongs to the deepest node whose
//! shape contains it. Children are expected to lie within their parent and
//! not overlap their siblings.

mod builder;

pub use builder::{GeometryBuilder, Volume};

use core::fmt;

use thiserror::Error;

use crate::material::Material;
use crate::math::{Transform, Vec3};
use crate::shape::{BoundaryTime, Shape, ShapeError};

/// Index of a node in a [`GeometryTree`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a material registered with a [`GeometryBuilder`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialId(pub(crate) u32);

impl MaterialId {
    /// Position of the material in the table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a volume treats a particle that enters it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VolumeKind {
    /// Free flight.
    Tracking,
    /// Reflecting or absorbing wall.
    Boundary,
    /// Detects with the given efficiency; undetected particles see a wall.
    Detector {
        /// Detection probability in `[0, 1]`.
        efficiency: f64,
    },
    /// Entry ends propagation as lost.
    BlackHole,
}

impl VolumeKind {
    /// Short label for logs and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tracking => "tracking",
            Self::Boundary => "boundary",
            Self::Detector { .. } => "detector",
            Self::BlackHole => "black-hole",
        }
    }
}

/// Construction-time geometry faults.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// `build` was called before a root volume was set.
    #[error("geometry has no root volume")]
    NoRoot,
    /// A second root volume was supplied.
    #[error("geometry root already set")]
    RootAlreadySet,
    /// A parent id that the builder never issued.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// A material id that the builder never issued.
    #[error("unknown material {}", .0.index())]
    UnknownMaterial(MaterialId),
    /// Material parameters are out of range.
    #[error("material {name:?}: {reason}")]
    InvalidMaterial {
        /// Material name.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Detector efficiency outside `[0, 1]`.
    #[error("volume {name:?}: detector efficiency {value} outside [0, 1]")]
    InvalidEfficiency {
        /// Volume name.
        name: String,
        /// Offending efficiency.
        value: f64,
    },
    /// A wall or detector whose material has no potential barrier.
    #[error("volume {name:?}: wall material needs a positive fermi potential")]
    WallWithoutPotential {
        /// Volume name.
        name: String,
    },
    /// A placement with NaN or infinite components.
    #[error("volume {name:?}: placement is not finite")]
    NonFinitePlacement {
        /// Volume name.
        name: String,
    },
    /// Two volumes share a name.
    #[error("duplicate volume name {0:?}")]
    DuplicateName(String),
    /// The arena is full.
    #[error("volume count exceeds the node id range")]
    TooManyVolumes,
    /// A child's bounds reach outside its parent's bounds.
    #[error("volume {child:?} extends outside its parent {parent:?}")]
    ChildExceedsParent {
        /// Child volume name.
        child: String,
        /// Parent volume name.
        parent: String,
    },
    /// A shape failed validation while the tree was being described.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// A placed volume in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    shape: Shape,
    kind: VolumeKind,
    material: MaterialId,
    local: Transform,
    global: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Volume name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape in the node's local frame.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Behaviour on entry.
    pub fn kind(&self) -> VolumeKind {
        self.kind
    }

    /// Wall material.
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Local-to-parent transform.
    pub fn local(&self) -> Transform {
        self.local
    }

    /// Local-to-world transform.
    pub fn global(&self) -> Transform {
        self.global
    }

    /// Parent node; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node's shape contains a world-frame point.
    pub fn contains_world(&self, point: Vec3) -> bool {
        self.shape.contains(self.global.point_to_local(point))
    }
}

/// Result of locating a world point in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Exactly one deepest node contains the point.
    Unique(NodeId),
    /// The root does not contain the point.
    Outside,
    /// Several siblings under one parent contain the point.
    Ambiguous(Vec<NodeId>),
}

/// Arena of volumes plus the material table.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryTree {
    nodes: Vec<Node>,
    materials: Vec<Material>,
}

impl GeometryTree {
    /// The root (world) volume.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of volumes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a built tree has a root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node behind `id`.
    ///
    /// Ids are only issued by the builder of this tree, so every id handed
    /// out is valid here.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The node behind `id`, or `None` for a foreign id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// All nodes with their ids.
    // The builder refuses to grow past u32::MAX nodes.
    #[allow(clippy::cast_possible_truncation)]
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Looks a volume up by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes().find(|(_, n)| n.name == name).map(|(id, _)| id)
    }

    /// Material behind `id`.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    /// Material of a node.
    pub fn material_of(&self, node: NodeId) -> &Material {
        self.material(self.node(node).material)
    }

    /// Whether `node`'s shape contains the world point.
    pub fn contains(&self, node: NodeId, point: Vec3) -> bool {
        self.node(node).contains_world(point)
    }

    /// Whether `node` contains the point and none of its children do.
    pub fn contains_exclusive(&self, node: NodeId, point: Vec3) -> bool {
        let n = self.node(node);
        n.contains_world(point) && !n.children.iter().any(|c| self.contains(*c, point))
    }

    /// Every node that exclusively contains the point.
    ///
    /// For a well-formed tree and a point inside the world this has exactly
    /// one element.
    pub fn containing_nodes(&self, point: Vec3) -> Vec<NodeId> {
        self.nodes().filter(|(id, _)| self.contains_exclusive(*id, point)).map(|(id, _)| id).collect()
    }

    /// Descends from the root to the deepest node containing the point.
    pub fn locate(&self, point: Vec3) -> Location {
        self.locate_from(self.root(), point)
    }

    /// Descends from `start` (assumed to contain the point) to the deepest
    /// containing node.
    pub fn locate_from(&self, start: NodeId, point: Vec3) -> Location {
        if !self.contains(start, point) {
            return Location::Outside;
        }
        let mut current = start;
        loop {
            let hits: Vec<NodeId> =
                self.node(current).children.iter().copied().filter(|c| self.contains(*c, point)).collect();
            match hits.as_slice() {
                [] => return Location::Unique(current),
                [only] => current = *only,
                _ => return Location::Ambiguous(hits),
            }
        }
    }

    /// Ids from the root down to `node`, inclusive.
    pub fn path_to(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut cursor = node;
        while let Some(parent) = self.node(cursor).parent {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }

    /// Whether `ancestor` lies on the path from the root to `node`
    /// (a node is its own ancestor).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.node(id).parent;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn nested() -> (GeometryTree, NodeId, NodeId) {
        let mut b = GeometryBuilder::new();
        let wall = b.add_material(Material::new("steel", 200e-9, 1e-4, 0.0)).unwrap();
        let vac = b.add_material(Material::vacuum()).unwrap();
        let root =
            b.set_root(Volume::new("world", Shape::cuboid(2.0, 2.0, 2.0).unwrap(), VolumeKind::Boundary, wall)).unwrap();
        let a = b
            .add_child(
                root,
                Volume::new("a", Shape::cuboid(0.5, 0.5, 0.5).unwrap(), VolumeKind::Tracking, vac)
                    .placed(Transform::from_translation(Vec3::new(-1.0, 0.0, 0.0))),
            )
            .unwrap();
        let c = b
            .add_child(
                root,
                Volume::new("c", Shape::tube(0.0, 0.5, 0.5).unwrap(), VolumeKind::Tracking, vac)
                    .placed(Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))),
            )
            .unwrap();
        (b.build().unwrap(), a, c)
    }

    #[test]
    fn locate_descends_to_deepest() {
        let (tree, a, c) = nested();
        assert_eq!(tree.locate(Vec3::new(-1.0, 0.0, 0.0)), Location::Unique(a));
        assert_eq!(tree.locate(Vec3::new(1.2, 0.0, 0.0)), Location::Unique(c));
        assert_eq!(tree.locate(Vec3::new(0.0, 1.5, 0.0)), Location::Unique(tree.root()));
        assert_eq!(tree.locate(Vec3::new(5.0, 0.0, 0.0)), Location::Outside);
    }

    #[test]
    fn exclusive_containment_has_one_owner() {
        let (tree, a, _) = nested();
        let p = Vec3::new(-1.2, 0.1, 0.0);
        assert_eq!(tree.containing_nodes(p), vec![a]);
        assert!(!tree.contains_exclusive(tree.root(), p));
    }

    #[test]
    fn ancestry() {
        let (tree, a, c) = nested();
        assert_eq!(tree.path_to(a), vec![tree.root(), a]);
        assert!(tree.is_ancestor(tree.root(), c));
        assert!(!tree.is_ancestor(a, c));
        assert_eq!(tree.find("c"), Some(c));
        assert_eq!(format!("{a}"), "#1");
    }
}

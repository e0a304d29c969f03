// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::collections::HashSet;

use tracing::debug;

use crate::geometry::{GeometryError, GeometryTree, MaterialId, Node, NodeId, VolumeKind};
use crate::material::Material;
use crate::math::Transform;
use crate::shape::{BoundaryTime, Shape};

/// Slack allowed when checking that a child's bounds sit inside its parent.
const FIT_SLACK: f64 = 1e-9;

/// Description of a volume to be placed by [`GeometryBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    name: String,
    shape: Shape,
    kind: VolumeKind,
    material: MaterialId,
    placement: Transform,
}

impl Volume {
    /// A volume at the identity placement.
    pub fn new(name: impl Into<String>, shape: Shape, kind: VolumeKind, material: MaterialId) -> Self {
        Self { name: name.into(), shape, kind, material, placement: Transform::identity() }
    }

    /// Sets the local-to-parent placement.
    pub fn placed(mut self, placement: Transform) -> Self {
        self.placement = placement;
        self
    }
}

/// Assembles a [`GeometryTree`], validating as it goes.
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    nodes: Vec<Node>,
    materials: Vec<Material>,
    names: HashSet<String>,
}

impl GeometryBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a material.
    pub fn add_material(&mut self, material: Material) -> Result<MaterialId, GeometryError> {
        if let Some(reason) = material.defect() {
            return Err(GeometryError::InvalidMaterial { name: material.name, reason });
        }
        let id = MaterialId(u32::try_from(self.materials.len()).map_err(|_| {
            GeometryError::InvalidMaterial { name: material.name.clone(), reason: "too many materials" }
        })?);
        self.materials.push(material);
        Ok(id)
    }

    /// Sets the world volume. Must be called exactly once, before children.
    pub fn set_root(&mut self, volume: Volume) -> Result<NodeId, GeometryError> {
        if !self.nodes.is_empty() {
            return Err(GeometryError::RootAlreadySet);
        }
        self.push(volume, None)
    }

    /// Places `volume` inside `parent`.
    pub fn add_child(&mut self, parent: NodeId, volume: Volume) -> Result<NodeId, GeometryError> {
        let Some(parent_node) = self.nodes.get(parent.index()) else {
            return Err(GeometryError::UnknownNode(parent));
        };
        let child_bounds = volume.shape.bounding_box().transformed(&volume.placement);
        let parent_bounds = parent_node.shape.bounding_box();
        let lo = child_bounds.min() - parent_bounds.min();
        let hi = parent_bounds.max() - child_bounds.max();
        if lo.min(&hi).to_array().iter().any(|d| *d < -FIT_SLACK) {
            return Err(GeometryError::ChildExceedsParent {
                child: volume.name,
                parent: parent_node.name.clone(),
            });
        }
        self.push(volume, Some(parent))
    }

    fn push(&mut self, volume: Volume, parent: Option<NodeId>) -> Result<NodeId, GeometryError> {
        let Volume { name, shape, kind, material, placement } = volume;
        let Some(mat) = self.materials.get(material.index()) else {
            return Err(GeometryError::UnknownMaterial(material));
        };
        if !placement.is_finite() {
            return Err(GeometryError::NonFinitePlacement { name });
        }
        match kind {
            VolumeKind::Detector { efficiency } if !(0.0..=1.0).contains(&efficiency) => {
                return Err(GeometryError::InvalidEfficiency { name, value: efficiency });
            }
            VolumeKind::Boundary | VolumeKind::Detector { .. } if mat.fermi_potential <= 0.0 => {
                return Err(GeometryError::WallWithoutPotential { name });
            }
            _ => {}
        }
        if self.names.contains(&name) {
            return Err(GeometryError::DuplicateName(name));
        }
        let id = NodeId(
            u32::try_from(self.nodes.len()).map_err(|_| GeometryError::TooManyVolumes)?,
        );
        let global = match parent {
            Some(p) => self.nodes[p.index()].global.then(&placement),
            None => placement,
        };
        if let Some(p) = parent {
            self.nodes[p.index()].children.push(id);
        }
        debug!(node = %id, name = %name, kind = kind.label(), shape = shape.kind(), "volume placed");
        self.names.insert(name.clone());
        self.nodes.push(Node {
            name,
            shape,
            kind,
            material,
            local: placement,
            global,
            parent,
            children: Vec::new(),
        });
        Ok(id)
    }

    /// Finishes the tree.
    pub fn build(self) -> Result<GeometryTree, GeometryError> {
        if self.nodes.is_empty() {
            return Err(GeometryError::NoRoot);
        }
        Ok(GeometryTree { nodes: self.nodes, materials: self.materials })
    }
}

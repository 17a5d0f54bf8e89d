// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena scene graph with an IFC metadata side table
//!
//! Transforms use the column-vector convention: a node's world transform is
//! `parent_world * local`.

use ifc_extras_model::AssetType;
use nalgebra::Matrix4;
use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;

/// Type-safe node handle into a [`SceneGraph`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Errors from linking nodes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttachError {
    /// Node handle does not belong to this graph
    #[error("Unknown {0}")]
    UnknownNode(NodeId),

    /// Parent and child are the same node
    #[error("Cannot attach {0} to itself")]
    SelfAttachment(NodeId),

    /// Child is already an ancestor of the parent
    #[error("Attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    /// Parent world transform has no inverse
    #[error("World transform of {0} is not invertible")]
    SingularTransform(NodeId),
}

/// A node of the scene graph
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    /// Node name, the identity key for IFC lookups
    pub name: Option<String>,
    local: Matrix4<f64>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    /// Transform relative to the parent
    pub fn local_transform(&self) -> &Matrix4<f64> {
        &self.local
    }

    /// Parent node, `None` for unattached nodes and scene roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in attachment order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// IFC identity recorded for a scene node
#[derive(Clone, Debug, PartialEq)]
pub struct IfcMetadata {
    /// IFC element id
    pub id: String,
    /// IFC type tag (e.g. "IfcWall")
    pub tag: String,
    /// Discipline the node belongs to
    pub asset_type: AssetType,
    /// Storey elevation, when known
    pub elevation: Option<f32>,
}

impl IfcMetadata {
    /// Create metadata without elevation
    pub fn new(id: impl Into<String>, tag: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            asset_type,
            elevation: None,
        }
    }

    /// Set elevation
    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// Whether both id and tag are present
    pub fn is_ifc(&self) -> bool {
        !self.id.is_empty() && !self.tag.is_empty()
    }
}

/// Arena of scene nodes
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    metadata: FxHashMap<NodeId, IfcMetadata>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unattached node
    pub fn add_node(&mut self, name: Option<String>, local: Matrix4<f64>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name,
            local,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Add an unattached named node
    pub fn add_named_node(&mut self, name: impl Into<String>, local: Matrix4<f64>) -> NodeId {
        self.add_node(Some(name.into()), local)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Node name
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.name.as_deref()
    }

    /// Rename a node
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.name = Some(name.into());
                true
            }
            None => false,
        }
    }

    /// Local transform of a node
    pub fn local_transform(&self, id: NodeId) -> Option<Matrix4<f64>> {
        self.node(id).map(|n| n.local)
    }

    /// Replace the local transform of a node
    pub fn set_local_transform(&mut self, id: NodeId, local: Matrix4<f64>) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.local = local;
                true
            }
            None => false,
        }
    }

    /// World transform, composed from the node up through its ancestors
    pub fn world_transform(&self, id: NodeId) -> Option<Matrix4<f64>> {
        let node = self.node(id)?;
        let mut world = node.local;
        let mut current = node.parent;
        while let Some(parent_id) = current {
            let parent = self.node(parent_id)?;
            world = parent.local * world;
            current = parent.parent;
        }
        Some(world)
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Children of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Whether `ancestor` is `node` or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Attach `child` under `parent`, detaching it from its previous parent
    ///
    /// The child's local transform is kept as is.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), AttachError> {
        self.check_attach(parent, child)?;
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Move `child` under `parent` without changing its world placement
    ///
    /// Both world transforms are read before any linkage changes; the new
    /// local transform is `inverse(parent_world) * child_world`.
    pub fn reparent_preserving_world(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<(), AttachError> {
        self.check_attach(parent, child)?;

        let child_world = self
            .world_transform(child)
            .ok_or(AttachError::UnknownNode(child))?;
        let parent_world = self
            .world_transform(parent)
            .ok_or(AttachError::UnknownNode(parent))?;
        let inverse_parent = parent_world
            .try_inverse()
            .ok_or(AttachError::SingularTransform(parent))?;

        self.nodes[child.0].local = inverse_parent * child_world;
        self.attach_child(parent, child)
    }

    /// Unlink a node from its parent
    pub fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.nodes.get_mut(child.0).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent.0) {
            parent_node.children.retain(|&c| c != child);
        }
    }

    /// First node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name.as_deref() == Some(name))
            .map(NodeId)
    }

    /// Iterate a subtree depth-first, starting with `root`
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let stack = if self.node(root).is_some() {
            vec![root]
        } else {
            Vec::new()
        };
        Descendants { graph: self, stack }
    }

    /// IFC metadata of a node
    pub fn metadata(&self, id: NodeId) -> Option<&IfcMetadata> {
        self.metadata.get(&id)
    }

    /// Record IFC metadata for a node
    pub fn set_metadata(&mut self, id: NodeId, metadata: IfcMetadata) {
        self.metadata.insert(id, metadata);
    }

    /// Whether the node carries IFC identity
    pub fn is_ifc_node(&self, id: NodeId) -> bool {
        self.metadata(id).is_some_and(IfcMetadata::is_ifc)
    }

    /// Copy IFC metadata from one node to another
    pub fn copy_metadata(&mut self, from: NodeId, to: NodeId) {
        match self.metadata.get(&from).cloned() {
            Some(metadata) => {
                self.metadata.insert(to, metadata);
            }
            None => {
                self.metadata.remove(&to);
            }
        }
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<(), AttachError> {
        if self.node(parent).is_none() {
            return Err(AttachError::UnknownNode(parent));
        }
        if self.node(child).is_none() {
            return Err(AttachError::UnknownNode(child));
        }
        if parent == child {
            return Err(AttachError::SelfAttachment(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(AttachError::Cycle { parent, child });
        }
        Ok(())
    }
}

/// Depth-first iterator over a subtree
pub struct Descendants<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Reverse so the first child is visited first
        self.stack.extend(self.graph.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn translation(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    #[test]
    fn test_world_transform_composes_ancestors() {
        let mut graph = SceneGraph::new();
        let a = graph.add_named_node("a", translation(1.0, 0.0, 0.0));
        let b = graph.add_named_node("b", Matrix4::new_scaling(2.0));
        let c = graph.add_named_node("c", translation(0.0, 1.0, 0.0));
        graph.attach_child(a, b).unwrap();
        graph.attach_child(b, c).unwrap();

        let expected =
            translation(1.0, 0.0, 0.0) * Matrix4::new_scaling(2.0) * translation(0.0, 1.0, 0.0);
        assert_relative_eq!(graph.world_transform(c).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_attach_moves_between_parents() {
        let mut graph = SceneGraph::new();
        let a = graph.add_named_node("a", Matrix4::identity());
        let b = graph.add_named_node("b", Matrix4::identity());
        let child = graph.add_named_node("child", Matrix4::identity());

        graph.attach_child(a, child).unwrap();
        graph.attach_child(b, child).unwrap();

        assert!(graph.children(a).is_empty());
        assert_eq!(graph.children(b), &[child]);
        assert_eq!(graph.parent(child), Some(b));
    }

    #[test]
    fn test_attach_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.add_named_node("a", Matrix4::identity());
        let b = graph.add_named_node("b", Matrix4::identity());
        graph.attach_child(a, b).unwrap();

        assert_eq!(
            graph.attach_child(b, a),
            Err(AttachError::Cycle { parent: b, child: a })
        );
        assert_eq!(graph.attach_child(a, a), Err(AttachError::SelfAttachment(a)));
        assert_eq!(
            graph.attach_child(a, NodeId(99)),
            Err(AttachError::UnknownNode(NodeId(99)))
        );
        assert_eq!(graph.parent(a), None);
    }

    #[test]
    fn test_reparent_preserves_world_placement() {
        let mut graph = SceneGraph::new();
        let parent = graph.add_named_node(
            "parent",
            translation(3.0, -2.0, 5.0) * Matrix4::new_rotation(Vector3::new(0.0, 0.0, 0.7)),
        );
        let child = graph.add_named_node(
            "child",
            translation(10.0, 4.0, 1.0)
                * Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 2.0, 0.5)),
        );
        let child_world = graph.world_transform(child).unwrap();
        let parent_world = graph.world_transform(parent).unwrap();

        graph.reparent_preserving_world(parent, child).unwrap();

        assert_eq!(graph.parent(child), Some(parent));
        let local = graph.local_transform(child).unwrap();
        assert_relative_eq!(parent_world * local, child_world, epsilon = 1e-9);
        assert_relative_eq!(graph.world_transform(child).unwrap(), child_world, epsilon = 1e-9);
    }

    #[test]
    fn test_reparent_rejects_singular_parent() {
        let mut graph = SceneGraph::new();
        let flat = graph.add_named_node(
            "flat",
            Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, 0.0)),
        );
        let child = graph.add_named_node("child", translation(1.0, 1.0, 1.0));

        assert_eq!(
            graph.reparent_preserving_world(flat, child),
            Err(AttachError::SingularTransform(flat))
        );
        assert_eq!(graph.parent(child), None);
        assert_eq!(graph.local_transform(child), Some(translation(1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_descendants_depth_first() {
        let mut graph = SceneGraph::new();
        let root = graph.add_named_node("root", Matrix4::identity());
        let a = graph.add_named_node("a", Matrix4::identity());
        let a1 = graph.add_named_node("a1", Matrix4::identity());
        let b = graph.add_named_node("b", Matrix4::identity());
        graph.attach_child(root, a).unwrap();
        graph.attach_child(a, a1).unwrap();
        graph.attach_child(root, b).unwrap();

        let order: Vec<NodeId> = graph.descendants(root).collect();
        assert_eq!(order, vec![root, a, a1, b]);
        assert_eq!(graph.descendants(NodeId(42)).count(), 0);
    }

    #[test]
    fn test_metadata_side_table() {
        let mut graph = SceneGraph::new();
        let wall = graph.add_named_node("W1", Matrix4::identity());
        let copy = graph.add_named_node("W1-copy", Matrix4::identity());

        assert!(!graph.is_ifc_node(wall));
        graph.set_metadata(wall, IfcMetadata::new("W1", "IfcWall", AssetType::Architectural));
        assert!(graph.is_ifc_node(wall));

        graph.copy_metadata(wall, copy);
        assert_eq!(graph.metadata(copy).map(|m| m.tag.as_str()), Some("IfcWall"));

        graph.set_metadata(copy, IfcMetadata::new("W1", "", AssetType::Architectural));
        assert!(!graph.is_ifc_node(copy));
    }

    #[test]
    fn test_names() {
        let mut graph = SceneGraph::new();
        let unnamed = graph.add_node(None, Matrix4::identity());
        assert_eq!(graph.name(unnamed), None);
        assert!(graph.set_name(unnamed, "L1"));
        assert_eq!(graph.find_by_name("L1"), Some(unnamed));
        assert!(!graph.set_name(NodeId(7), "missing"));
    }
}

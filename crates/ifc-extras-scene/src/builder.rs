// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial tree builder
//!
//! Moves flat scene nodes under their logical IFC parents while keeping every
//! node's world placement unchanged.

use crate::factory::NodeFactory;
use crate::graph::{IfcMetadata, NodeId, SceneGraph};
use ifc_extras_model::{AssetType, Attribute, Hierarchy, HEAD_NODE_ID};
use log::{debug, warn};
use nalgebra::Matrix4;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Result of building one discipline's spatial tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpatialTree {
    /// Discipline root node
    pub root: NodeId,
    /// Number of child edges applied
    pub reparented: usize,
    /// Number of child edges skipped
    pub skipped: usize,
    /// Number of nodes created through the factory
    pub synthesized: usize,
}

/// Build the spatial tree of `asset_type` from its hierarchy
///
/// Ids found in `existing` reuse that node; every other id gets a node from
/// `factory`. Children of the head node are attached directly under the new
/// discipline root without touching their transforms. All other children are
/// moved under their parent with a local transform that keeps their world
/// placement.
///
/// Parents are processed breadth-first from the head node. A child listed
/// under several parents ends up under the one processed last, and each id is
/// expanded at most once, so duplicate ids and cycles terminate.
pub fn build<F: NodeFactory + ?Sized>(
    graph: &mut SceneGraph,
    hierarchy: &Hierarchy,
    asset_type: AssetType,
    existing: &FxHashMap<String, NodeId>,
    factory: &mut F,
) -> SpatialTree {
    build_under(graph, None, hierarchy, asset_type, existing, factory)
}

/// Build the spatial tree with the discipline root attached under `parent`
///
/// The root is attached before any child is moved, so world placements are
/// computed in the root's final frame. If the attachment fails the root is
/// left detached.
pub fn build_under<F: NodeFactory + ?Sized>(
    graph: &mut SceneGraph,
    parent: Option<NodeId>,
    hierarchy: &Hierarchy,
    asset_type: AssetType,
    existing: &FxHashMap<String, NodeId>,
    factory: &mut F,
) -> SpatialTree {
    let root = graph.add_named_node(asset_type.display_name(), Matrix4::identity());
    if let Some(parent) = parent {
        if let Err(e) = graph.attach_child(parent, root) {
            warn!("Could not add {} root under {}: {}", asset_type, parent, e);
        }
    }
    let mut builder = TreeBuilder {
        graph,
        asset_type,
        nodes: FxHashMap::default(),
        tree: SpatialTree {
            root,
            reparented: 0,
            skipped: 0,
            synthesized: 0,
        },
    };

    builder.resolve_nodes(hierarchy, existing, factory);
    builder.link(hierarchy);

    debug!(
        "{} tree: {} reparented, {} skipped, {} synthesized",
        asset_type, builder.tree.reparented, builder.tree.skipped, builder.tree.synthesized
    );
    builder.tree
}

/// Helper struct for building the spatial tree
struct TreeBuilder<'a> {
    graph: &'a mut SceneGraph,
    asset_type: AssetType,
    /// Element id to scene node
    nodes: FxHashMap<String, NodeId>,
    tree: SpatialTree,
}

impl TreeBuilder<'_> {
    /// Map every referenced id to a node, creating missing ones
    fn resolve_nodes<F: NodeFactory + ?Sized>(
        &mut self,
        hierarchy: &Hierarchy,
        existing: &FxHashMap<String, NodeId>,
        factory: &mut F,
    ) {
        for attribute in hierarchy.all_ids() {
            if attribute.is_head() || self.nodes.contains_key(&attribute.id) {
                continue;
            }
            let node = match existing.get(&attribute.id) {
                Some(&node) => {
                    if self.graph.metadata(node).is_none() {
                        let metadata = self.metadata_for(attribute);
                        self.graph.set_metadata(node, metadata);
                    }
                    node
                }
                None => {
                    self.tree.synthesized += 1;
                    factory.create_node(
                        self.graph,
                        &attribute.id,
                        &attribute.type_tag,
                        self.asset_type,
                    )
                }
            };
            self.nodes.insert(attribute.id.clone(), node);
        }
    }

    fn metadata_for(&self, attribute: &Attribute) -> IfcMetadata {
        IfcMetadata::new(&attribute.id, &attribute.type_tag, self.asset_type)
            .with_elevation(attribute.elevation)
    }

    /// Breadth-first reparenting from the head node
    fn link(&mut self, hierarchy: &Hierarchy) {
        let mut queue: VecDeque<&str> = VecDeque::from([HEAD_NODE_ID]);
        let mut enqueued: FxHashSet<&str> = FxHashSet::default();
        enqueued.insert(HEAD_NODE_ID);

        while let Some(parent_id) = queue.pop_front() {
            let Some(element) = hierarchy.get(parent_id) else {
                continue;
            };

            for child in &element.children {
                self.link_child(parent_id, &child.id);
                if enqueued.insert(child.id.as_str()) {
                    queue.push_back(child.id.as_str());
                }
            }
        }
    }

    fn link_child(&mut self, parent_id: &str, child_id: &str) {
        let Some(&child) = self.nodes.get(child_id) else {
            warn!(
                "No scene node for {}, skipping edge from {}",
                child_id, parent_id
            );
            self.tree.skipped += 1;
            return;
        };

        let result = if parent_id == HEAD_NODE_ID {
            self.graph.attach_child(self.tree.root, child)
        } else {
            let Some(&parent) = self.nodes.get(parent_id) else {
                warn!(
                    "No scene node for {}, skipping edge to {}",
                    parent_id, child_id
                );
                self.tree.skipped += 1;
                return;
            };
            self.graph.reparent_preserving_world(parent, child)
        };

        match result {
            Ok(()) => {
                debug!("{} -> {}", parent_id, child_id);
                self.tree.reparented += 1;
            }
            Err(e) => {
                warn!("Skipping {} -> {}: {}", parent_id, child_id, e);
                self.tree.skipped += 1;
            }
        }
    }
}

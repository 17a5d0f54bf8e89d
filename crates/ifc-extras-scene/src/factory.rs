// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Creation of placeholder nodes for ids without scene geometry

use crate::graph::{IfcMetadata, NodeId, SceneGraph};
use ifc_extras_model::AssetType;
use nalgebra::Matrix4;

/// Creates scene nodes for hierarchy ids that have no existing node
///
/// Implementations must return a node that is not attached to any parent.
/// Closures of the form `FnMut(&mut SceneGraph, &str, &str, AssetType) -> NodeId`
/// implement this trait.
pub trait NodeFactory {
    /// Create an unattached node for element `id` of type `type_tag`
    fn create_node(
        &mut self,
        graph: &mut SceneGraph,
        id: &str,
        type_tag: &str,
        asset_type: AssetType,
    ) -> NodeId;
}

/// Default factory: an empty, identity-transform node named after the id
/// and tagged with its IFC metadata
#[derive(Clone, Copy, Debug, Default)]
pub struct IfcNodeFactory;

impl NodeFactory for IfcNodeFactory {
    fn create_node(
        &mut self,
        graph: &mut SceneGraph,
        id: &str,
        type_tag: &str,
        asset_type: AssetType,
    ) -> NodeId {
        let node = graph.add_named_node(id, Matrix4::identity());
        graph.set_metadata(
            node,
            IfcMetadata::new(id, type_tag, asset_type).with_elevation(0.0),
        );
        node
    }
}

impl<F> NodeFactory for F
where
    F: FnMut(&mut SceneGraph, &str, &str, AssetType) -> NodeId,
{
    fn create_node(
        &mut self,
        graph: &mut SceneGraph,
        id: &str,
        type_tag: &str,
        asset_type: AssetType,
    ) -> NodeId {
        self(graph, id, type_tag, asset_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factory_tags_node() {
        let mut graph = SceneGraph::new();
        let node = IfcNodeFactory.create_node(
            &mut graph,
            "L1",
            "IfcBuildingStorey",
            AssetType::Structural,
        );

        assert_eq!(graph.name(node), Some("L1"));
        assert_eq!(graph.parent(node), None);
        assert_eq!(graph.local_transform(node), Some(Matrix4::identity()));

        let metadata = graph.metadata(node).unwrap();
        assert_eq!(metadata.id, "L1");
        assert_eq!(metadata.tag, "IfcBuildingStorey");
        assert_eq!(metadata.asset_type, AssetType::Structural);
        assert_eq!(metadata.elevation, Some(0.0));
        assert!(graph.is_ifc_node(node));
    }

    #[test]
    fn test_closure_factory() {
        let mut created = Vec::new();
        let mut factory = |graph: &mut SceneGraph, id: &str, tag: &str, _: AssetType| {
            created.push(format!("{}:{}", id, tag));
            graph.add_named_node(format!("synthetic-{}", id), Matrix4::identity())
        };

        let mut graph = SceneGraph::new();
        let node = factory.create_node(&mut graph, "B1", "IfcBuilding", AssetType::Mep);
        assert_eq!(graph.name(node), Some("synthetic-B1"));
        drop(factory);
        assert_eq!(created, vec!["B1:IfcBuilding"]);
    }
}

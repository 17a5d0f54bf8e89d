// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Extras Scene
//!
//! Rebuilds the logical IFC spatial tree of a loaded glTF scene.
//!
//! ## Overview
//!
//! IFC exporters flatten the building into top-level scene nodes and keep the
//! decomposition only in the scene extras. This crate reads that
//! decomposition (via `ifc-extras-parser`) and nests the nodes accordingly:
//!
//! - **Scene graph**: Arena of nodes with local/world transforms and an IFC metadata side table
//! - **Node factory**: Placeholder nodes for ids that have no geometry in the scene
//! - **Tree builder**: Breadth-first reparenting that keeps every world placement
//! - **Reconstruction**: Per-discipline composition with failure isolation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_extras_scene::{reconstruct_all, IfcNodeFactory, ReconstructOptions, SceneAsset};
//!
//! let mut asset: SceneAsset = load_scene()?;
//! for outcome in reconstruct_all(&mut asset, &ReconstructOptions::default(), &mut IfcNodeFactory) {
//!     if let Ok(tree) = outcome.result {
//!         println!("{}: {} nodes placed", outcome.asset_type, tree.reparented);
//!     }
//! }
//! ```

pub mod builder;
pub mod factory;
pub mod graph;
pub mod reconstruct;
pub mod scene;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Vector3};

// Re-export main types
pub use builder::{build, build_under, SpatialTree};
pub use factory::{IfcNodeFactory, NodeFactory};
pub use graph::{AttachError, Descendants, IfcMetadata, NodeId, SceneGraph, SceneNode};
pub use reconstruct::{
    reconstruct, reconstruct_all, reconstruct_with, DisciplineOutcome, ReconstructOptions,
};
pub use scene::{Scene, SceneAsset};

pub use ifc_extras_model::{AssetType, ExtrasError, ExtrasValue, Hierarchy, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    /// The smallest complete decomposition: one project, site, building and storey
    #[test]
    fn test_minimal_scene_round_trip() {
        let extras = ExtrasValue::from(json!({"ifc0": {"decomposition": {"IfcProject": {
            "_attributes": {"id": "P1"},
            "IfcSite": {
                "_attributes": {"id": "S1"},
                "IfcBuilding": {
                    "_attributes": {"id": "B1"},
                    "IfcBuildingStorey": [{"_attributes": {"id": "L1"}}]
                }
            }
        }}}}));

        let mut asset = SceneAsset::new();
        let scene = asset.add_scene(None, Some(extras));
        let placement = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 4.2));
        let storey = asset.add_top_level_node(scene, "L1", placement).unwrap();

        let tree =
            reconstruct(&mut asset, AssetType::Architectural, &mut IfcNodeFactory).unwrap();

        let building = asset.graph.parent(storey).unwrap();
        assert_eq!(asset.graph.name(building), Some("B1"));
        let parent_world = asset.graph.world_transform(building).unwrap();
        let local = asset.graph.local_transform(storey).unwrap();
        assert_relative_eq!(parent_world * local, placement, epsilon = 1e-12);

        let path: Vec<&str> = asset
            .graph
            .descendants(tree.root)
            .filter_map(|id| asset.graph.name(id))
            .collect();
        assert_eq!(path, vec!["Architectural", "P1", "S1", "B1", "L1"]);
    }
}

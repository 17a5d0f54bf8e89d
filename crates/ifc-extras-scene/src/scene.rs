// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scenes and loaded assets

use crate::graph::{NodeId, SceneGraph};
use ifc_extras_model::ExtrasValue;
use nalgebra::Matrix4;
use rustc_hash::FxHashMap;

/// A scene: a root node in the shared graph plus the scene extras
#[derive(Clone, Debug)]
pub struct Scene {
    /// Scene name
    pub name: Option<String>,
    /// Extras payload attached to the scene
    pub extras: Option<ExtrasValue>,
    root: NodeId,
}

impl Scene {
    /// Root node; top-level nodes are its children
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Named direct children of the scene root, keyed by name
    ///
    /// These are the pre-existing nodes the spatial tree builder reuses.
    /// When several top-level nodes share a name the first one wins.
    pub fn top_level_nodes(&self, graph: &SceneGraph) -> FxHashMap<String, NodeId> {
        let mut nodes = FxHashMap::default();
        for &child in graph.children(self.root) {
            if let Some(name) = graph.name(child) {
                nodes.entry(name.to_string()).or_insert(child);
            }
        }
        nodes
    }
}

/// A loaded asset: one scene graph shared by all its scenes
#[derive(Clone, Debug, Default)]
pub struct SceneAsset {
    /// Node storage
    pub graph: SceneGraph,
    scenes: Vec<Scene>,
    default_scene: Option<usize>,
}

impl SceneAsset {
    /// Create an empty asset
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scene; the first scene added becomes the default
    pub fn add_scene(&mut self, name: Option<String>, extras: Option<ExtrasValue>) -> usize {
        let root = self.graph.add_node(None, Matrix4::identity());
        let index = self.scenes.len();
        self.scenes.push(Scene { name, extras, root });
        if self.default_scene.is_none() {
            self.default_scene = Some(index);
        }
        index
    }

    /// Select the default scene
    pub fn set_default_scene(&mut self, index: usize) -> bool {
        if index < self.scenes.len() {
            self.default_scene = Some(index);
            true
        } else {
            false
        }
    }

    /// All scenes
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Get a scene by index
    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    /// Index of the default scene
    pub fn default_scene_index(&self) -> Option<usize> {
        self.default_scene
    }

    /// The default scene
    pub fn default_scene(&self) -> Option<&Scene> {
        self.scene(self.default_scene?)
    }

    /// Add a named node directly under a scene's root
    pub fn add_top_level_node(
        &mut self,
        scene: usize,
        name: impl Into<String>,
        local: Matrix4<f64>,
    ) -> Option<NodeId> {
        let root = self.scenes.get(scene)?.root;
        let node = self.graph.add_named_node(name, local);
        self.graph.attach_child(root, node).ok()?;
        Some(node)
    }

    /// Mutable graph together with a scene
    pub(crate) fn split_scene(&mut self, index: usize) -> Option<(&mut SceneGraph, &Scene)> {
        let scene = self.scenes.get(index)?;
        Some((&mut self.graph, scene))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_scene_is_default() {
        let mut asset = SceneAsset::new();
        assert!(asset.default_scene().is_none());

        let first = asset.add_scene(Some("main".to_string()), None);
        let second = asset.add_scene(None, Some(ExtrasValue::from(json!({"ifc0": {}}))));
        assert_eq!(asset.default_scene_index(), Some(first));

        assert!(asset.set_default_scene(second));
        assert!(asset.default_scene().unwrap().extras.is_some());
        assert!(!asset.set_default_scene(5));
        assert_eq!(asset.scenes().len(), 2);
    }

    #[test]
    fn test_top_level_nodes() {
        let mut asset = SceneAsset::new();
        let scene = asset.add_scene(None, None);
        let wall = asset
            .add_top_level_node(scene, "W1", Matrix4::identity())
            .unwrap();
        let duplicate = asset
            .add_top_level_node(scene, "W1", Matrix4::identity())
            .unwrap();
        let nested = asset.graph.add_named_node("nested", Matrix4::identity());
        asset.graph.attach_child(wall, nested).unwrap();
        let root = asset.scene(scene).unwrap().root();
        let unnamed = asset.graph.add_node(None, Matrix4::identity());
        asset.graph.attach_child(root, unnamed).unwrap();

        let nodes = asset.scene(scene).unwrap().top_level_nodes(&asset.graph);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes.get("W1"), Some(&wall));
        assert_ne!(nodes.get("W1"), Some(&duplicate));
        assert!(!nodes.contains_key("nested"));
    }

    #[test]
    fn test_add_top_level_node_unknown_scene() {
        let mut asset = SceneAsset::new();
        assert!(asset
            .add_top_level_node(3, "W1", Matrix4::identity())
            .is_none());
    }
}

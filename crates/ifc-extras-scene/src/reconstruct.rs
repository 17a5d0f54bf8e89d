// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction and tree building against a whole asset

use crate::builder::{build_under, SpatialTree};
use crate::factory::NodeFactory;
use crate::scene::SceneAsset;
use ifc_extras_model::{AssetType, ExtrasError, Result};
use ifc_extras_parser::{ExtractorOptions, HierarchyExtractor};
use log::{info, warn};
use serde::Deserialize;

/// Reconstruction settings
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ReconstructOptions {
    /// Disciplines processed by [`reconstruct_all`], in order
    pub disciplines: Vec<AssetType>,
    /// Attach each discipline root under the scene root
    pub attach_to_scene: bool,
    /// Hierarchy extraction settings
    pub extractor: ExtractorOptions,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            disciplines: AssetType::DEFAULT_DISCIPLINES.to_vec(),
            attach_to_scene: true,
            extractor: ExtractorOptions::default(),
        }
    }
}

impl ReconstructOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the disciplines to process
    pub fn with_disciplines(mut self, disciplines: impl IntoIterator<Item = AssetType>) -> Self {
        self.disciplines = disciplines.into_iter().collect();
        self
    }

    /// Set whether discipline roots are added to the scene
    pub fn with_attach_to_scene(mut self, attach: bool) -> Self {
        self.attach_to_scene = attach;
        self
    }

    /// Set extraction settings
    pub fn with_extractor(mut self, extractor: ExtractorOptions) -> Self {
        self.extractor = extractor;
        self
    }
}

/// Outcome of one discipline in [`reconstruct_all`]
#[derive(Debug)]
pub struct DisciplineOutcome {
    /// The discipline
    pub asset_type: AssetType,
    /// Built tree, or why the discipline was not loaded
    pub result: Result<SpatialTree>,
}

impl DisciplineOutcome {
    /// Whether the discipline was not part of the asset
    pub fn is_absent(&self) -> bool {
        matches!(&self.result, Err(e) if e.is_discipline_absent())
    }
}

/// Rebuild the spatial tree of one discipline in the asset's default scene
pub fn reconstruct<F: NodeFactory + ?Sized>(
    asset: &mut SceneAsset,
    asset_type: AssetType,
    factory: &mut F,
) -> Result<SpatialTree> {
    reconstruct_with(asset, asset_type, &ReconstructOptions::default(), factory)
}

/// Rebuild the spatial tree of one discipline with explicit settings
///
/// Nothing in the scene is touched unless extraction succeeds.
pub fn reconstruct_with<F: NodeFactory + ?Sized>(
    asset: &mut SceneAsset,
    asset_type: AssetType,
    options: &ReconstructOptions,
    factory: &mut F,
) -> Result<SpatialTree> {
    let index = asset
        .default_scene_index()
        .ok_or(ExtrasError::SceneUnavailable)?;
    let (graph, scene) = asset
        .split_scene(index)
        .ok_or(ExtrasError::SceneUnavailable)?;
    let extras = scene.extras.as_ref().ok_or(ExtrasError::MissingExtras)?;

    let hierarchy =
        HierarchyExtractor::with_options(options.extractor.clone()).extract(extras, asset_type)?;
    let existing = scene.top_level_nodes(graph);
    let parent = options.attach_to_scene.then(|| scene.root());

    Ok(build_under(graph, parent, &hierarchy, asset_type, &existing, factory))
}

/// Rebuild every configured discipline, isolating failures per discipline
///
/// A discipline missing from the asset is expected and only logged at info
/// level; other failures are logged as warnings. Processing always continues
/// with the next discipline.
pub fn reconstruct_all<F: NodeFactory + ?Sized>(
    asset: &mut SceneAsset,
    options: &ReconstructOptions,
    factory: &mut F,
) -> Vec<DisciplineOutcome> {
    let mut outcomes = Vec::with_capacity(options.disciplines.len());
    for &asset_type in &options.disciplines {
        let result = reconstruct_with(asset, asset_type, options, factory);
        match &result {
            Ok(tree) => info!(
                "Loaded {} hierarchy ({} nodes placed)",
                asset_type, tree.reparented
            ),
            Err(e) if e.is_discipline_absent() => info!("{}", e),
            Err(e) => warn!("Failed to load {} hierarchy: {}", asset_type, e),
        }
        outcomes.push(DisciplineOutcome { asset_type, result });
    }
    outcomes
}

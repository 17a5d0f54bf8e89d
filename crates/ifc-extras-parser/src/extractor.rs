// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hierarchy extractor and decomposition walk

use ifc_extras_model::{
    AssetType, Attribute, ExtrasError, ExtrasMap, ExtrasValue, Hierarchy, IfcObjectType, Result,
    ATTRIBUTES_KEY, ID_KEY, NAME_KEY,
};
use log::{debug, error};
use serde::Deserialize;
use std::borrow::Cow;

const DECOMPOSITION_KEY: &str = "decomposition";

/// Extraction settings
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ExtractorOptions {
    /// Fail when a building storey has no attribute record
    pub require_storey_attributes: bool,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            require_storey_attributes: true,
        }
    }
}

/// Builds a [`Hierarchy`] for one discipline from scene extras
#[derive(Clone, Debug, Default)]
pub struct HierarchyExtractor {
    options: ExtractorOptions,
}

impl HierarchyExtractor {
    /// Create an extractor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with explicit settings
    pub fn with_options(options: ExtractorOptions) -> Self {
        Self { options }
    }

    /// Set whether storeys without attributes abort extraction
    pub fn with_storey_attributes_required(mut self, required: bool) -> Self {
        self.options.require_storey_attributes = required;
        self
    }

    /// Extract the hierarchy of `asset_type` from the scene extras
    ///
    /// The Project → Site → Building → Storey spine is validated first and
    /// the first missing section aborts extraction. The whole project is then
    /// walked and every record found at any depth is linked to its nearest
    /// enclosing record.
    pub fn extract(&self, extras: &ExtrasValue, asset_type: AssetType) -> Result<Hierarchy> {
        let extras = extras.as_map().ok_or(ExtrasError::MissingExtras)?;
        let asset = child_map(extras, &asset_type.extras_key())
            .ok_or(ExtrasError::DisciplineAbsent(asset_type))?;
        let decomposition =
            child_map(asset, DECOMPOSITION_KEY).ok_or(ExtrasError::DecompositionMissing)?;
        let project = child_map(decomposition, IfcObjectType::IfcProject.as_str())
            .ok_or(ExtrasError::ProjectMissing)?;

        let head = Attribute::head();
        self.validate_spine(project, &head)?;

        let mut builder = HierarchyBuilder::default();
        builder.walk(project, IfcObjectType::IfcProject.as_str(), &head)?;

        debug!(
            "{} hierarchy: {} parents, {} records",
            asset_type,
            builder.hierarchy.len(),
            builder.hierarchy.record_count()
        );
        Ok(builder.hierarchy)
    }

    fn validate_spine(&self, project: &ExtrasMap, head: &Attribute) -> Result<()> {
        let project_attr = required_attribute(project, IfcObjectType::IfcProject, head)?;

        let site = child_map(project, IfcObjectType::IfcSite.as_str())
            .ok_or(ExtrasError::SiteMissing)?;
        let site_attr = required_attribute(site, IfcObjectType::IfcSite, &project_attr)?;

        let building = child_map(site, IfcObjectType::IfcBuilding.as_str())
            .ok_or(ExtrasError::BuildingMissing)?;
        let building_attr = required_attribute(building, IfcObjectType::IfcBuilding, &site_attr)?;

        for storey in storeys(building) {
            let attribute = match storey {
                Some(storey) => read_attribute(
                    storey,
                    IfcObjectType::IfcBuildingStorey.as_str(),
                    &building_attr,
                )?,
                None => None,
            };
            if attribute.is_none() && self.options.require_storey_attributes {
                return Err(ExtrasError::attributes_missing(
                    IfcObjectType::IfcBuildingStorey.as_str(),
                ));
            }
        }

        Ok(())
    }
}

/// Read the attribute record of `node`
///
/// Returns `Ok(None)` when the node has no `_attributes` map or the map has
/// no non-empty string `id`. The record's parent id is taken from `parent`.
pub fn read_attribute(
    node: &ExtrasMap,
    type_tag: &str,
    parent: &Attribute,
) -> Result<Option<Attribute>> {
    let Some(attributes) = child_map(node, ATTRIBUTES_KEY) else {
        return Ok(None);
    };
    let Some(id) = attributes
        .get(ID_KEY)
        .and_then(ExtrasValue::as_str)
        .filter(|id| !id.is_empty())
    else {
        return Ok(None);
    };

    if parent.id.is_empty() && !parent.is_head() {
        error!("Child element {} should have a parent id", id);
        return Err(ExtrasError::inconsistent(format!(
            "element {} has an empty parent id",
            id
        )));
    }

    let name = attributes
        .get(NAME_KEY)
        .and_then(ExtrasValue::as_str)
        .unwrap_or("");

    Ok(Some(Attribute::new(id, name, type_tag, parent.id.as_str())))
}

fn required_attribute(
    node: &ExtrasMap,
    object_type: IfcObjectType,
    parent: &Attribute,
) -> Result<Attribute> {
    read_attribute(node, object_type.as_str(), parent)?
        .ok_or_else(|| ExtrasError::attributes_missing(object_type.as_str()))
}

fn child_map<'a>(node: &'a ExtrasMap, key: &str) -> Option<&'a ExtrasMap> {
    node.get(key).and_then(ExtrasValue::as_map)
}

/// Storey entries under a building; a single map counts as one storey
///
/// List items that are not maps are kept as `None` so they can be rejected.
fn storeys(building: &ExtrasMap) -> Vec<Option<&ExtrasMap>> {
    match building.get(IfcObjectType::IfcBuildingStorey.as_str()) {
        Some(ExtrasValue::List(items)) => items.iter().map(ExtrasValue::as_map).collect(),
        Some(ExtrasValue::Map(storey)) => vec![Some(storey)],
        _ => Vec::new(),
    }
}

/// Accumulates parent-child relations during the walk
#[derive(Default)]
struct HierarchyBuilder {
    hierarchy: Hierarchy,
}

impl HierarchyBuilder {
    /// Visit `node`, found under key `type_tag`, with `parent` as context
    fn walk(&mut self, node: &ExtrasMap, type_tag: &str, parent: &Attribute) -> Result<()> {
        let context = match read_attribute(node, type_tag, parent)? {
            Some(attribute) => {
                debug!("{} -> {}", parent.id, attribute);
                self.hierarchy.upsert(parent, attribute.clone());
                Cow::Owned(attribute)
            }
            None => Cow::Borrowed(parent),
        };

        for (key, value) in node {
            if key == ATTRIBUTES_KEY {
                continue;
            }
            match value {
                ExtrasValue::Map(child) => self.walk(child, key, &context)?,
                ExtrasValue::List(items) => {
                    for child in items.iter().filter_map(ExtrasValue::as_map) {
                        self.walk(child, key, &context)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for hierarchy extraction and reconstruction

use crate::AssetType;
use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtrasError>;

/// Errors that can occur while reading IFC data from scene extras
///
/// None of these are retryable: they describe either a discipline that is
/// simply not part of the asset or a malformed decomposition.
#[derive(Error, Debug)]
pub enum ExtrasError {
    /// Scene carries no extras payload at all
    #[error("No extras found on the scene")]
    MissingExtras,

    /// No default scene to read extras from
    #[error("No scene available for root node hierarchy")]
    SceneUnavailable,

    /// The discipline namespace key is not present in the extras
    #[error("No asset type {0} found in the IFC hierarchy")]
    DisciplineAbsent(AssetType),

    /// `decomposition` section missing
    #[error("Expected decomposition is empty")]
    DecompositionMissing,

    /// `IfcProject` section missing
    #[error("Expected IfcProject is empty")]
    ProjectMissing,

    /// `IfcSite` section missing under the project
    #[error("Expected IfcSite is empty")]
    SiteMissing,

    /// `IfcBuilding` section missing under the site
    #[error("Expected IfcBuilding is empty")]
    BuildingMissing,

    /// A required element lacked a valid `_attributes.id`
    #[error("No attributes found on IFC element {0}")]
    AttributesMissing(String),

    /// A non-root record resolved with an empty parent id
    #[error("IFC hierarchy consistency error: {0}")]
    HierarchyInconsistent(String),

    /// Extras JSON could not be decoded
    #[error("Invalid extras JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtrasError {
    /// Create an attributes error for the given element type tag
    pub fn attributes_missing(type_tag: impl Into<String>) -> Self {
        ExtrasError::AttributesMissing(type_tag.into())
    }

    /// Create a hierarchy consistency error
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        ExtrasError::HierarchyInconsistent(msg.into())
    }

    /// Whether this error only means the discipline is not part of the asset
    ///
    /// Callers iterating over disciplines treat this as the common case,
    /// not as a load failure.
    pub fn is_discipline_absent(&self) -> bool {
        matches!(self, ExtrasError::DisciplineAbsent(_))
    }
}

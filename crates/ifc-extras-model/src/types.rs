// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building discipline and IFC object type names

use serde::{Deserialize, Serialize};
use std::fmt;

/// Building discipline of an exported asset
///
/// The numeric tag selects the discipline's namespace inside the scene
/// extras (`"ifc0"`, `"ifc1"`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Architectural,
    Structural,
    Mep,
    Scan,
    None,
}

impl AssetType {
    /// The four real disciplines, in tag order
    pub const ALL: [AssetType; 4] = [
        AssetType::Architectural,
        AssetType::Structural,
        AssetType::Mep,
        AssetType::Scan,
    ];

    /// Disciplines a viewer loads when nothing else is configured
    pub const DEFAULT_DISCIPLINES: [AssetType; 3] = [
        AssetType::Architectural,
        AssetType::Structural,
        AssetType::Mep,
    ];

    /// Numeric discipline tag
    pub fn tag(&self) -> u16 {
        match self {
            AssetType::Architectural => 0,
            AssetType::Structural => 1,
            AssetType::Mep => 2,
            AssetType::Scan => 3,
            AssetType::None => 4,
        }
    }

    /// Discipline for a numeric tag
    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            0 => Some(AssetType::Architectural),
            1 => Some(AssetType::Structural),
            2 => Some(AssetType::Mep),
            3 => Some(AssetType::Scan),
            4 => Some(AssetType::None),
            _ => None,
        }
    }

    /// Key of this discipline's namespace in the scene extras
    pub fn extras_key(&self) -> String {
        format!("ifc{}", self.tag())
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            AssetType::Architectural => "Architectural",
            AssetType::Structural => "Structural",
            AssetType::Mep => "MEP",
            AssetType::Scan => "3D Scan",
            AssetType::None => "",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Fixed spatial structure levels of the decomposition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IfcObjectType {
    IfcProject,
    IfcSite,
    IfcBuilding,
    IfcBuildingStorey,
}

impl IfcObjectType {
    /// Key under which this level appears in the decomposition
    pub fn as_str(&self) -> &'static str {
        match self {
            IfcObjectType::IfcProject => "IfcProject",
            IfcObjectType::IfcSite => "IfcSite",
            IfcObjectType::IfcBuilding => "IfcBuilding",
            IfcObjectType::IfcBuildingStorey => "IfcBuildingStorey",
        }
    }
}

impl fmt::Display for IfcObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extras_key() {
        assert_eq!(AssetType::Architectural.extras_key(), "ifc0");
        assert_eq!(AssetType::Mep.extras_key(), "ifc2");
        assert_eq!(AssetType::None.extras_key(), "ifc4");
    }

    #[test]
    fn test_tag_round_trip() {
        for asset_type in AssetType::ALL {
            assert_eq!(AssetType::from_tag(asset_type.tag()), Some(asset_type));
        }
        assert_eq!(AssetType::from_tag(5), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(AssetType::Scan.to_string(), "3D Scan");
        assert_eq!(AssetType::Mep.to_string(), "MEP");
        assert_eq!(AssetType::None.to_string(), "");
    }

    #[test]
    fn test_deserialize_lowercase() {
        let parsed: Vec<AssetType> = serde_json::from_str(r#"["architectural", "mep"]"#).unwrap();
        assert_eq!(parsed, vec![AssetType::Architectural, AssetType::Mep]);
    }
}

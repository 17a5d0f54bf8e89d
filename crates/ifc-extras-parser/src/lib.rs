// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Extras Parser - Hierarchy extraction from scene extras
//!
//! Reads the decomposition an IFC exporter embeds in glTF scene extras and
//! turns it into a typed [`Hierarchy`] for one discipline.
//!
//! # Features
//!
//! - **Fail-fast spine validation** of Project → Site → Building → Storeys
//! - **Generic recursive walk** that links element records at any depth
//! - **Lenient traversal** of decorative or geometric sub-maps without records
//!
//! # Example
//!
//! ```ignore
//! use ifc_extras_parser::HierarchyExtractor;
//! use ifc_extras_model::AssetType;
//!
//! let extractor = HierarchyExtractor::new();
//! let hierarchy = extractor.extract(&extras, AssetType::Architectural)?;
//! println!("{} parents", hierarchy.len());
//! ```

mod extractor;

pub use extractor::{read_attribute, ExtractorOptions, HierarchyExtractor};

use ifc_extras_model::{AssetType, ExtrasValue, Hierarchy, Result};

/// Quick extraction with default options
pub fn extract(extras: &ExtrasValue, asset_type: AssetType) -> Result<Hierarchy> {
    HierarchyExtractor::new().extract(extras, asset_type)
}

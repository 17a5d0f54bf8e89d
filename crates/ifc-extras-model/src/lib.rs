// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Extras Model - Shared types for IFC decomposition data
//!
//! IFC-to-glTF exporters embed the building decomposition
//! (Project → Site → Building → Storey → Elements) as untyped JSON inside the
//! scene `extras`. This crate provides the typed vocabulary the rest of the
//! workspace works with:
//!
//! - [`ExtrasValue`] - Recursive representation of the untyped payload
//! - [`AssetType`] - Building discipline used as the namespace key into extras
//! - [`Attribute`] - Identity record of a single IFC element
//! - [`Element`] - A parent attribute with its direct children
//! - [`Hierarchy`] - Parent id → [`Element`] mapping for one discipline
//! - [`ExtrasError`] - Failure kinds of hierarchy extraction and reconstruction
//!
//! # Example
//!
//! ```ignore
//! use ifc_extras_model::{AssetType, ExtrasValue};
//!
//! let extras = ExtrasValue::from_json_str(scene_extras_json)?;
//! let project = extras
//!     .get_map(&AssetType::Architectural.extras_key())
//!     .and_then(|asset| asset.get("decomposition"));
//! ```

pub mod error;
pub mod hierarchy;
pub mod types;
pub mod value;

// Re-export all public types
pub use error::*;
pub use hierarchy::*;
pub use types::*;
pub use value::*;

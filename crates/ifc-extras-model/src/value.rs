// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Untyped extras payload
//!
//! glTF `extras` are arbitrary JSON. The exporter nests element records,
//! geometry descriptors and decorative data freely, so the payload is kept as
//! a small recursive sum type and inspected through accessors that return
//! `Option` instead of casting.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map of string keys to extras values
///
/// Keys iterate in sorted order, which makes every walk over the payload
/// deterministic.
pub type ExtrasMap = BTreeMap<String, ExtrasValue>;

/// A dynamically typed extras value
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtrasValue {
    /// JSON null
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// String value
    String(String),
    /// Sequence of values
    List(Vec<ExtrasValue>),
    /// Nested map
    Map(ExtrasMap),
}

impl ExtrasValue {
    /// Decode an extras payload from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Ok(value.into())
    }

    /// Try to get as map
    pub fn as_map(&self) -> Option<&ExtrasMap> {
        match self {
            ExtrasValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[ExtrasValue]> {
        match self {
            ExtrasValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtrasValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExtrasValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExtrasValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, ExtrasValue::Null)
    }

    /// Look up a key when this value is a map
    pub fn get(&self, key: &str) -> Option<&ExtrasValue> {
        self.as_map()?.get(key)
    }

    /// Look up a nested map by key
    pub fn get_map(&self, key: &str) -> Option<&ExtrasMap> {
        self.get(key)?.as_map()
    }

    /// Look up a nested list by key
    pub fn get_list(&self, key: &str) -> Option<&[ExtrasValue]> {
        self.get(key)?.as_list()
    }

    /// Look up a string by key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }
}

impl From<serde_json::Value> for ExtrasValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ExtrasValue::Null,
            serde_json::Value::Bool(b) => ExtrasValue::Bool(b),
            serde_json::Value::Number(n) => {
                n.as_f64().map_or(ExtrasValue::Null, ExtrasValue::Number)
            }
            serde_json::Value::String(s) => ExtrasValue::String(s),
            serde_json::Value::Array(items) => {
                ExtrasValue::List(items.into_iter().map(ExtrasValue::from).collect())
            }
            serde_json::Value::Object(map) => ExtrasValue::Map(
                map.into_iter()
                    .map(|(key, value)| (key, ExtrasValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<ExtrasMap> for ExtrasValue {
    fn from(map: ExtrasMap) -> Self {
        ExtrasValue::Map(map)
    }
}

impl From<&str> for ExtrasValue {
    fn from(s: &str) -> Self {
        ExtrasValue::String(s.to_string())
    }
}

impl From<String> for ExtrasValue {
    fn from(s: String) -> Self {
        ExtrasValue::String(s)
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parent-child hierarchy reconstructed from the extras decomposition

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id of the synthetic root every discipline's tree hangs from
pub const HEAD_NODE_ID: &str = "headNode";
/// Key of the attribute record inside an element map
pub const ATTRIBUTES_KEY: &str = "_attributes";
/// Key of the element id inside an attribute record
pub const ID_KEY: &str = "id";
/// Key of the optional element name inside an attribute record
pub const NAME_KEY: &str = "Name";

/// Identity record of one IFC element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Element id, unique within one discipline
    pub id: String,
    /// Human readable label, empty when absent
    pub name: String,
    /// Structural role (e.g. "IfcSite", "IfcWall")
    pub type_tag: String,
    /// Always 0.0 for now; not read from the payload
    pub elevation: f32,
    /// Id of the logical parent
    pub parent_id: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        type_tag: impl Into<String>,
        parent_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_tag: type_tag.into(),
            elevation: 0.0,
            parent_id: parent_id.into(),
        }
    }

    /// The synthetic root attribute
    pub fn head() -> Self {
        Self::new(HEAD_NODE_ID, "", "IfcProject", "")
    }

    /// Whether this is the synthetic root
    pub fn is_head(&self) -> bool {
        self.id == HEAD_NODE_ID
    }

    /// Set elevation
    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' ({}) elevation={} parent={}",
            self.id, self.name, self.type_tag, self.elevation, self.parent_id
        )
    }
}

/// A parent attribute together with its direct children
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// The parent's own attribute
    pub attribute: Attribute,
    /// Direct children in discovery order
    pub children: Vec<Attribute>,
}

impl Element {
    /// Create an element with a single child
    pub fn new(attribute: Attribute, child: Attribute) -> Self {
        Self {
            attribute,
            children: vec![child],
        }
    }

    /// Add a child attribute
    pub fn add_child(&mut self, child: Attribute) {
        self.children.push(child);
    }

    /// Ids of the direct children
    pub fn child_ids(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|c| c.id.as_str())
    }
}

/// Mapping from parent id to [`Element`] for one discipline
///
/// Built fresh per extraction. Parent ids keep their first-seen order so that
/// iteration is deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hierarchy {
    elements: FxHashMap<String, Element>,
    order: Vec<String>,
}

impl Hierarchy {
    /// Create an empty hierarchy
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `child` under `parent`
    ///
    /// The stored parent attribute is replaced by the one supplied last;
    /// children always append.
    pub fn upsert(&mut self, parent: &Attribute, child: Attribute) {
        match self.elements.get_mut(&parent.id) {
            Some(element) => {
                element.attribute = parent.clone();
                element.add_child(child);
            }
            None => {
                self.order.push(parent.id.clone());
                self.elements
                    .insert(parent.id.clone(), Element::new(parent.clone(), child));
            }
        }
    }

    /// Get the element for a parent id
    pub fn get(&self, parent_id: &str) -> Option<&Element> {
        self.elements.get(parent_id)
    }

    /// Whether a parent id has children recorded
    pub fn contains(&self, parent_id: &str) -> bool {
        self.elements.contains_key(parent_id)
    }

    /// Number of parent entries
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no relation was recorded
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Parent ids in first-seen order
    pub fn parent_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Elements in first-seen order of their parent id
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Total number of child records across all parents
    pub fn record_count(&self) -> usize {
        self.elements.values().map(|e| e.children.len()).sum()
    }

    /// Every id referenced as a parent or a child, deduplicated
    ///
    /// Each id is paired with the attribute it was first seen with.
    pub fn all_ids(&self) -> Vec<&Attribute> {
        let mut seen = FxHashSet::default();
        let mut ids = Vec::new();
        for element in self.elements() {
            if seen.insert(element.attribute.id.as_str()) {
                ids.push(&element.attribute);
            }
            for child in &element.children {
                if seen.insert(child.id.as_str()) {
                    ids.push(child);
                }
            }
        }
        ids
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in self.elements() {
            let children: Vec<&str> = element.child_ids().collect();
            writeln!(f, "{} -> [{}]", element.attribute.id, children.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(id: &str, parent: &str) -> Attribute {
        Attribute::new(id, "", "IfcBuildingElementProxy", parent)
    }

    #[test]
    fn test_head_attribute() {
        let head = Attribute::head();
        assert!(head.is_head());
        assert_eq!(head.type_tag, "IfcProject");
        assert!(head.parent_id.is_empty());
        assert_eq!(head.elevation, 0.0);
    }

    #[test]
    fn test_upsert_creates_and_appends() {
        let mut hierarchy = Hierarchy::new();
        let head = Attribute::head();
        hierarchy.upsert(&head, attr("P1", HEAD_NODE_ID));
        hierarchy.upsert(&head, attr("P2", HEAD_NODE_ID));

        assert_eq!(hierarchy.len(), 1);
        let element = hierarchy.get(HEAD_NODE_ID).unwrap();
        assert_eq!(element.child_ids().collect::<Vec<_>>(), vec!["P1", "P2"]);
        assert_eq!(hierarchy.record_count(), 2);
    }

    #[test]
    fn test_parent_ids_in_first_seen_order() {
        let mut hierarchy = Hierarchy::new();
        let head = Attribute::head();
        let project = attr("P1", HEAD_NODE_ID);
        let site = attr("S1", "P1");
        hierarchy.upsert(&head, project.clone());
        hierarchy.upsert(&project, site.clone());
        hierarchy.upsert(&site, attr("B1", "S1"));
        hierarchy.upsert(&head, attr("P2", HEAD_NODE_ID));

        let ids: Vec<&str> = hierarchy.parent_ids().collect();
        assert_eq!(ids, vec![HEAD_NODE_ID, "P1", "S1"]);
        assert!(hierarchy.contains("S1"));
        assert!(!hierarchy.contains("B1"));
    }

    #[test]
    fn test_upsert_last_parent_attribute_wins() {
        let mut hierarchy = Hierarchy::new();
        let first = Attribute::new("X", "first", "IfcWall", "L1");
        let second = Attribute::new("X", "second", "IfcWall", "L2");
        hierarchy.upsert(&first, attr("A", "X"));
        hierarchy.upsert(&second, attr("B", "X"));

        let element = hierarchy.get("X").unwrap();
        assert_eq!(element.attribute.name, "second");
        assert_eq!(element.attribute.parent_id, "L2");
        assert_eq!(element.children.len(), 2);
    }

    #[test]
    fn test_all_ids_deduplicated_in_order() {
        let mut hierarchy = Hierarchy::new();
        let head = Attribute::head();
        let project = attr("P1", HEAD_NODE_ID);
        hierarchy.upsert(&head, project.clone());
        hierarchy.upsert(&project, attr("S1", "P1"));

        let ids: Vec<&str> = hierarchy.all_ids().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec![HEAD_NODE_ID, "P1", "S1"]);
    }

    #[test]
    fn test_display() {
        let mut hierarchy = Hierarchy::new();
        hierarchy.upsert(&Attribute::head(), attr("P1", HEAD_NODE_ID));
        assert_eq!(hierarchy.to_string(), "headNode -> [P1]\n");
    }
}

//! Vertex implementation for the import graph
//!
//! A vertex is addressed by a deterministic [`VertexId`] and carries a
//! multi-valued [`PropertySet`]. Vertices are never deleted; every write
//! merges into what is already there.

use super::property::{PropertyEntry, PropertySet, PropertyValue, PROP_CONCEPT_TYPE, PROP_TITLE};
use super::types::VertexId;
use serde::{Deserialize, Serialize};

/// A vertex in the property graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// Deterministic identifier for this vertex
    pub id: VertexId,

    /// Multi-valued properties keyed by provenance
    pub properties: PropertySet,
}

impl Vertex {
    /// Create an empty vertex
    pub fn new(id: impl Into<VertexId>) -> Self {
        Vertex {
            id: id.into(),
            properties: PropertySet::new(),
        }
    }

    /// Add (or replace) the value at `(name, key)`
    pub fn add_property_value(
        &mut self,
        name: impl Into<String>,
        key: impl Into<String>,
        entry: PropertyEntry,
    ) -> bool {
        self.properties.upsert(name, key, entry)
    }

    /// Get the value stored at `(name, key)`
    pub fn get_property_value(&self, name: &str, key: &str) -> Option<&PropertyValue> {
        self.properties.get(name, key).map(|e| &e.value)
    }

    /// All values of a property
    pub fn get_property_values(&self, name: &str) -> Vec<&PropertyValue> {
        self.properties.values(name)
    }

    /// Check if property exists
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    /// Concept types asserted for this vertex
    pub fn concept_types(&self) -> Vec<&str> {
        self.get_property_values(PROP_CONCEPT_TYPE)
            .into_iter()
            .filter_map(PropertyValue::as_string)
            .collect()
    }

    pub fn has_concept_type(&self, concept_type: &str) -> bool {
        self.concept_types().contains(&concept_type)
    }

    /// First title, if any
    pub fn title(&self) -> Option<&str> {
        self.get_property_values(PROP_TITLE)
            .into_iter()
            .find_map(PropertyValue::as_string)
    }

    /// Merge another view of the same vertex into this one.
    ///
    /// Returns `true` when anything changed.
    pub fn merge(&mut self, other: Vertex) -> bool {
        debug_assert_eq!(self.id, other.id);
        self.properties.union(other.properties)
    }

    /// Get number of property entries
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

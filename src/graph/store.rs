//! In-memory merge store
//!
//! Models the storage collaborator that consumes the mutation stream:
//! - vertex property writes are unioned per `(name, key)`
//! - edges are upserted by canonical id
//! - data rows are addressed by `(row, name, key)`
//!
//! Applying the same mutation any number of times, in any order relative
//! to other records' mutations, converges to the same state. Edges do not
//! require their endpoints to exist yet; the other record may simply not
//! have been processed.

use super::edge::Edge;
use super::mutation::{Mutation, MutationOp, MutationSink};
use super::property::{PropertyValue, PROP_CONCEPT_TYPE};
use super::types::{EdgeId, EdgeLabel, VertexId};
use super::vertex::Vertex;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while applying mutations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Edge {id} already exists with different endpoints or label")]
    EdgeConflict { id: EdgeId },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

type DataKey = (String, String, String);

/// In-memory graph state built from mutations
#[derive(Debug, Default, Clone)]
pub struct MergeStore {
    /// Vertex storage
    vertices: FxHashMap<VertexId, Vertex>,

    /// Edge storage
    edges: FxHashMap<EdgeId, Edge>,

    /// Streamed property bytes: (row, name, key) -> bytes
    data: FxHashMap<DataKey, Vec<u8>>,

    /// Concept type index for fast lookups
    concept_index: FxHashMap<String, FxHashSet<VertexId>>,

    /// Edge label index
    label_index: FxHashMap<EdgeLabel, FxHashSet<EdgeId>>,
}

impl MergeStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one mutation. Returns `true` when the store changed.
    pub fn apply(&mut self, mutation: Mutation) -> StoreResult<bool> {
        let Mutation { row, op, .. } = mutation;
        match op {
            MutationOp::UpsertVertex { properties } => {
                let id = VertexId::new(row);
                let mut changed = !self.vertices.contains_key(&id);
                let vertex = self
                    .vertices
                    .entry(id.clone())
                    .or_insert_with(|| Vertex::new(id.clone()));
                for write in properties {
                    if write.name == PROP_CONCEPT_TYPE {
                        if let PropertyValue::String(concept) = &write.entry.value {
                            self.concept_index
                                .entry(concept.clone())
                                .or_default()
                                .insert(id.clone());
                        }
                    }
                    changed |= vertex.add_property_value(write.name, write.key, write.entry);
                }
                Ok(changed)
            }
            MutationOp::UpsertEdge {
                label,
                out_vertex,
                in_vertex,
            } => {
                let edge = Edge::new(EdgeId::new(row), out_vertex, in_vertex, label);
                self.upsert_edge(edge)
            }
            MutationOp::PutData { name, key, bytes } => {
                let previous = self.data.insert((row, name, key), bytes.clone());
                Ok(previous.as_ref() != Some(&bytes))
            }
        }
    }

    /// Apply a batch of mutations, returning how many changed the store
    pub fn apply_all(&mut self, mutations: impl IntoIterator<Item = Mutation>) -> StoreResult<usize> {
        let mut changed = 0;
        for mutation in mutations {
            if self.apply(mutation)? {
                changed += 1;
            }
        }
        debug!("Applied mutations, {} changed the store", changed);
        Ok(changed)
    }

    fn upsert_edge(&mut self, edge: Edge) -> StoreResult<bool> {
        if let Some(existing) = self.edges.get(&edge.id) {
            if existing != &edge {
                warn!("Conflicting write for edge {}", edge.id);
                return Err(StoreError::EdgeConflict { id: edge.id });
            }
            return Ok(false);
        }
        self.label_index
            .entry(edge.label.clone())
            .or_default()
            .insert(edge.id.clone());
        self.edges.insert(edge.id.clone(), edge);
        Ok(true)
    }

    /// Merge another store into this one (e.g. the output of another worker)
    pub fn merge(&mut self, other: MergeStore) -> StoreResult<bool> {
        let mut changed = false;
        for (id, vertex) in other.vertices {
            for concept in vertex.concept_types() {
                self.concept_index
                    .entry(concept.to_string())
                    .or_default()
                    .insert(id.clone());
            }
            match self.vertices.get_mut(&id) {
                Some(existing) => changed |= existing.merge(vertex),
                None => {
                    self.vertices.insert(id, vertex);
                    changed = true;
                }
            }
        }
        for (_, edge) in other.edges {
            changed |= self.upsert_edge(edge)?;
        }
        for (key, bytes) in other.data {
            let previous = self.data.insert(key, bytes.clone());
            changed |= previous.as_ref() != Some(&bytes);
        }
        Ok(changed)
    }

    pub fn get_vertex(&self, id: &VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn has_vertex(&self, id: &VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn get_edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn has_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    /// Bytes stored for a streamed property
    pub fn get_data(&self, row: &str, name: &str, key: &str) -> Option<&[u8]> {
        self.data
            .get(&(row.to_string(), name.to_string(), key.to_string()))
            .map(Vec::as_slice)
    }

    /// Get all vertices with a given concept type
    pub fn get_vertices_by_concept(&self, concept_type: &str) -> Vec<&Vertex> {
        self.concept_index
            .get(concept_type)
            .map(|ids| ids.iter().filter_map(|id| self.vertices.get(id)).collect())
            .unwrap_or_default()
    }

    /// Get all edges with a given label
    pub fn get_edges_by_label(&self, label: &EdgeLabel) -> Vec<&Edge> {
        self.label_index
            .get(label)
            .map(|ids| ids.iter().filter_map(|id| self.edges.get(id)).collect())
            .unwrap_or_default()
    }

    /// Get outgoing edges of a vertex
    pub fn get_outgoing_edges(&self, vertex: &VertexId) -> Vec<&Edge> {
        self.edges.values().filter(|e| e.starts_from(vertex)).collect()
    }

    /// Get incoming edges of a vertex
    pub fn get_incoming_edges(&self, vertex: &VertexId) -> Vec<&Edge> {
        self.edges.values().filter(|e| e.ends_at(vertex)).collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn data_count(&self) -> usize {
        self.data.len()
    }
}

impl MutationSink for MergeStore {
    fn write(&mut self, mutation: Mutation) -> StoreResult<()> {
        self.apply(mutation).map(|_| ())
    }
}

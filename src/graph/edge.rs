//! Edge implementation for the import graph
//!
//! Edges are directed and addressed by a canonical [`EdgeId`]; writing the
//! same edge twice is an upsert, never a duplicate.

use super::types::{EdgeId, EdgeLabel, VertexId};
use serde::{Deserialize, Serialize};

/// A directed, labeled edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Canonical identifier for this edge
    pub id: EdgeId,

    /// Vertex the edge goes FROM
    pub out_vertex: VertexId,

    /// Vertex the edge goes TO
    pub in_vertex: VertexId,

    /// Relationship label
    pub label: EdgeLabel,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(
        id: EdgeId,
        out_vertex: VertexId,
        in_vertex: VertexId,
        label: impl Into<EdgeLabel>,
    ) -> Self {
        Edge {
            id,
            out_vertex,
            in_vertex,
            label: label.into(),
        }
    }

    /// Check if this edge goes FROM a specific vertex
    pub fn starts_from(&self, vertex: &VertexId) -> bool {
        &self.out_vertex == vertex
    }

    /// Check if this edge goes TO a specific vertex
    pub fn ends_at(&self, vertex: &VertexId) -> bool {
        &self.in_vertex == vertex
    }
}

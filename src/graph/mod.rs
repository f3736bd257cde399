//! Property graph model for the importer
//!
//! This module implements:
//! - Vertices with deterministic ids and multi-valued, provenance-keyed properties
//! - Directed, labeled edges with canonical ids
//! - The mutation stream handed to the storage layer
//! - An in-memory merge store with idempotent-write semantics

pub mod edge;
pub mod mutation;
pub mod property;
pub mod store;
pub mod types;
pub mod vertex;

// Re-export main types
pub use edge::Edge;
pub use mutation::{JsonLinesSink, Mutation, MutationOp, MutationSink, PropertyWrite, Table, TableNames};
pub use property::{
    DatePrecision, PropertyEntry, PropertyMetadata, PropertySet, PropertyValue, StreamKind,
    PROP_CONCEPT_TYPE, PROP_RAW, PROP_SOURCE, PROP_TEXT, PROP_TITLE,
};
pub use store::{MergeStore, StoreError, StoreResult};
pub use types::{EdgeId, EdgeLabel, VertexId};
pub use vertex::Vertex;

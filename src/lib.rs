//! moviegraph
//!
//! Imports movie, person and production company metadata (TMDB-style JSON
//! documents) into a property graph as a stream of idempotent mutations.
//!
//! # Architecture
//!
//! - [`graph`]: vertex/edge model, multi-valued properties, the mutation
//!   stream and an in-memory merge store that consumes it
//! - [`import`]: record classification, entity builders, deterministic
//!   identity, date parsing and the parallel import driver
//! - [`config`]: YAML-backed import configuration
//!
//! Every record is processed independently. Vertex and edge ids are derived
//! from external ids only, so the same input always produces the same
//! mutations and re-importing never duplicates anything.
//!
//! ## Example Usage
//!
//! ```rust
//! use moviegraph::{ImportConfig, ImportPipeline, MergeStore, RawRecord, RecordType};
//!
//! let pipeline = ImportPipeline::new(&ImportConfig::default());
//! let records = vec![
//!     RawRecord::new(RecordType::Movie, r#"{"id":100,"title":"Heat"}"#),
//!     RawRecord::new(RecordType::Person, r#"{"id":7,"name":"Al Pacino"}"#),
//! ];
//!
//! let mut store = MergeStore::new();
//! let report = pipeline.run(records, &mut store).unwrap();
//!
//! assert_eq!(report.movies_processed, 1);
//! assert_eq!(report.persons_processed, 1);
//! assert_eq!(store.vertex_count(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod import;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, ImportConfig};

pub use graph::{
    Edge, EdgeId, EdgeLabel, JsonLinesSink, MergeStore, Mutation, MutationOp, MutationSink,
    PropertyEntry, PropertyValue, StoreError, StoreResult, TableNames, Vertex, VertexId,
};

pub use import::{
    classify, parse_flexible_date, read_records, CompanyId, EntityKind, ImportError,
    ImportPipeline, ImportReport, ImportResult, MovieId, PersonId, PipelineError,
    PipelineResult, RawRecord, RecordType, SkipReason,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

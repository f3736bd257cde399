//! Movie, person and production company import
//!
//! Record flow:
//! raw line -> [`classifier`] -> [`mapper`] (entity builders) ->
//! [`upsert`] (own vertex) + [`relationship`] (stub vertices and edges) ->
//! mutation sink.
//!
//! Convergence under parallel, repeated and out-of-order processing rests
//! on deterministic ids ([`ontology`]), provenance-keyed property writes
//! and canonical edge ids. No state is shared between records.

pub mod classifier;
pub mod date;
pub mod error;
pub mod mapper;
pub mod ontology;
pub mod pipeline;
pub mod record;
pub mod relationship;
pub mod report;
pub mod source;
pub mod upsert;

pub use classifier::{classify, decode, identify, ClassifiedRecord, EntityRecord, RecordType};
pub use date::{parse_flexible_date, FlexibleDate};
pub use error::{ImportError, ImportResult, PipelineError, PipelineResult, SkipReason};
pub use mapper::{Counter, RecordMapper, RecordOutput};
pub use ontology::{
    produced_edge_id, starred_in_edge_id, CompanyId, EntityKind, MovieId, PersonId,
};
pub use pipeline::{ImportPipeline, Worker};
pub use relationship::RelationshipResolver;
pub use report::ImportReport;
pub use source::{parse_tagged_line, read_records, RawRecord, SourceBatch};
pub use upsert::{EntityUpsertEngine, VertexBuilder};

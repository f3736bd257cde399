//! Graph mutations emitted by the importer
//!
//! Every mutation names a destination table and a row key equal to the
//! internal vertex or edge id. Consumers must treat a repeated identical
//! mutation as a no-op.

use super::property::PropertyEntry;
use super::store::{StoreError, StoreResult};
use super::types::{EdgeLabel, VertexId};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Destination table category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    Vertices,
    Edges,
    Data,
}

/// Concrete table names, derived from a common prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNames {
    pub vertices: String,
    pub edges: String,
    pub data: String,
}

impl TableNames {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            vertices: format!("{}_v", prefix),
            edges: format!("{}_e", prefix),
            data: format!("{}_d", prefix),
        }
    }

    pub fn name(&self, table: Table) -> &str {
        match table {
            Table::Vertices => &self.vertices,
            Table::Edges => &self.edges,
            Table::Data => &self.data,
        }
    }
}

/// A single property assertion inside a vertex mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyWrite {
    pub name: String,
    pub key: String,
    pub entry: PropertyEntry,
}

/// Mutation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MutationOp {
    /// Create-or-merge a vertex with the given property assertions
    UpsertVertex { properties: Vec<PropertyWrite> },
    /// Create-or-merge an edge
    UpsertEdge {
        label: EdgeLabel,
        out_vertex: VertexId,
        in_vertex: VertexId,
    },
    /// Bytes of a streamed property, addressed by `(row, name, key)`
    PutData {
        name: String,
        key: String,
        bytes: Vec<u8>,
    },
}

impl MutationOp {
    pub fn table(&self) -> Table {
        match self {
            MutationOp::UpsertVertex { .. } => Table::Vertices,
            MutationOp::UpsertEdge { .. } => Table::Edges,
            MutationOp::PutData { .. } => Table::Data,
        }
    }
}

/// A graph mutation tagged with its destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    /// Destination table name
    pub table: String,
    /// Row key (vertex or edge id)
    pub row: String,
    #[serde(flatten)]
    pub op: MutationOp,
}

impl Mutation {
    pub fn new(tables: &TableNames, row: impl Into<String>, op: MutationOp) -> Self {
        Self {
            table: tables.name(op.table()).to_string(),
            row: row.into(),
            op,
        }
    }

    pub fn kind(&self) -> Table {
        self.op.table()
    }
}

/// Append-only destination for mutations
pub trait MutationSink {
    fn write(&mut self, mutation: Mutation) -> StoreResult<()>;

    fn write_all(&mut self, mutations: Vec<Mutation>) -> StoreResult<()> {
        for mutation in mutations {
            self.write(mutation)?;
        }
        Ok(())
    }
}

impl MutationSink for Vec<Mutation> {
    fn write(&mut self, mutation: Mutation) -> StoreResult<()> {
        self.push(mutation);
        Ok(())
    }
}

/// Writes one JSON document per mutation
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of mutations written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MutationSink for JsonLinesSink<W> {
    fn write(&mut self, mutation: Mutation) -> StoreResult<()> {
        serde_json::to_writer(&mut self.writer, &mutation).map_err(|err| {
            if err.is_io() {
                StoreError::Io(err.into())
            } else {
                StoreError::Serialization(err)
            }
        })?;
        self.writer.write_all(b"\n").map_err(StoreError::Io)?;
        self.written += 1;
        Ok(())
    }
}

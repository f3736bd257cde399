//! Vertex create-or-merge
//!
//! A [`VertexBuilder`] collects property assertions for one vertex and
//! turns them into mutations on `save`. Every assertion is tagged with the
//! import's provenance key; multi-valued properties add a per-value
//! discriminator so their values coexist instead of overwriting each other.

use super::ontology::EntityKind;
use crate::graph::{
    Mutation, MutationOp, PropertyEntry, PropertyMetadata, PropertyValue, PropertyWrite,
    StreamKind, TableNames, VertexId, PROP_CONCEPT_TYPE, PROP_RAW, PROP_SOURCE, PROP_TEXT,
    PROP_TITLE,
};

/// Builds idempotent vertex mutations for one import source
#[derive(Debug, Clone)]
pub struct EntityUpsertEngine {
    tables: TableNames,
    source: String,
    provenance_key: String,
}

impl EntityUpsertEngine {
    pub fn new(tables: TableNames, source: impl Into<String>, provenance_key: impl Into<String>) -> Self {
        Self {
            tables,
            source: source.into(),
            provenance_key: provenance_key.into(),
        }
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    /// Provenance key qualified by a per-value discriminator
    pub fn qualified_key(&self, discriminator: impl std::fmt::Display) -> String {
        format!("{}_{}", self.provenance_key, discriminator)
    }

    /// Start a vertex of `kind`, with concept type and source already set
    pub fn prepare_vertex(&self, kind: EntityKind, id: VertexId) -> VertexBuilder<'_> {
        let mut builder = VertexBuilder {
            engine: self,
            id,
            properties: Vec::new(),
            data: Vec::new(),
        };
        builder.add(PROP_CONCEPT_TYPE, kind.concept_type());
        builder.add(PROP_SOURCE, self.source.as_str());
        builder
    }

    /// Minimal vertex for an entity referenced from another record
    pub fn stub(
        &self,
        kind: EntityKind,
        id: VertexId,
        title: Option<&str>,
        out: &mut Vec<Mutation>,
    ) -> VertexId {
        let mut builder = self.prepare_vertex(kind, id);
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            builder.add(PROP_TITLE, title);
        }
        builder.save(out)
    }
}

/// Pending property assertions for a single vertex
#[derive(Debug)]
pub struct VertexBuilder<'e> {
    engine: &'e EntityUpsertEngine,
    id: VertexId,
    properties: Vec<PropertyWrite>,
    data: Vec<(String, String, Vec<u8>)>,
}

impl VertexBuilder<'_> {
    /// Assert `value` under the plain provenance key
    pub fn add(&mut self, name: &str, value: impl Into<PropertyValue>) -> &mut Self {
        let key = self.engine.provenance_key.clone();
        self.add_entry(name, key, PropertyEntry::new(value))
    }

    /// Assert one value of a multi-valued property
    pub fn add_keyed(
        &mut self,
        name: &str,
        discriminator: impl std::fmt::Display,
        value: impl Into<PropertyValue>,
    ) -> &mut Self {
        let key = self.engine.qualified_key(discriminator);
        self.add_entry(name, key, PropertyEntry::new(value))
    }

    pub fn title(&mut self, title: &str) -> &mut Self {
        self.add(PROP_TITLE, title)
    }

    /// Store the verbatim source payload, excluded from search indexing
    pub fn raw(&mut self, payload: &str) -> &mut Self {
        let entry = PropertyEntry {
            value: PropertyValue::Stream {
                kind: StreamKind::Binary,
                length: payload.len() as u64,
            },
            metadata: PropertyMetadata::default(),
            search_indexed: false,
        };
        self.stream(PROP_RAW, entry, payload.as_bytes().to_vec())
    }

    /// Store a plain-text body with a descriptive label
    pub fn text(&mut self, description: &str, body: &str) -> &mut Self {
        let entry = PropertyEntry {
            value: PropertyValue::Stream {
                kind: StreamKind::Text,
                length: body.len() as u64,
            },
            metadata: PropertyMetadata::text(description),
            search_indexed: true,
        };
        self.stream(PROP_TEXT, entry, body.as_bytes().to_vec())
    }

    fn stream(&mut self, name: &str, entry: PropertyEntry, bytes: Vec<u8>) -> &mut Self {
        let key = self.engine.provenance_key.clone();
        self.data.push((name.to_string(), key.clone(), bytes));
        self.add_entry(name, key, entry)
    }

    fn add_entry(&mut self, name: &str, key: String, entry: PropertyEntry) -> &mut Self {
        // a later assertion at the same (name, key) replaces the earlier one
        self.properties.retain(|w| !(w.name == name && w.key == key));
        self.properties.push(PropertyWrite {
            name: name.to_string(),
            key,
            entry,
        });
        self
    }

    /// Emit the vertex mutation followed by its data rows
    pub fn save(self, out: &mut Vec<Mutation>) -> VertexId {
        let engine = self.engine;
        let tables = &engine.tables;
        let row = self.id.as_str();
        out.push(Mutation::new(
            tables,
            row,
            MutationOp::UpsertVertex {
                properties: self.properties,
            },
        ));
        for (name, key, bytes) in self.data {
            out.push(Mutation::new(tables, row, MutationOp::PutData { name, key, bytes }));
        }
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Table;

    fn engine() -> EntityUpsertEngine {
        EntityUpsertEngine::new(TableNames::with_prefix("t"), "TheMovieDb.org", "prov")
    }

    fn writes(m: &Mutation) -> &[PropertyWrite] {
        match &m.op {
            MutationOp::UpsertVertex { properties } => properties,
            other => panic!("expected vertex mutation, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_sets_concept_and_source() {
        let engine = engine();
        let mut out = Vec::new();
        let id = engine
            .prepare_vertex(EntityKind::Movie, VertexId::new("M"))
            .save(&mut out);

        assert_eq!(id, VertexId::new("M"));
        assert_eq!(out.len(), 1);
        let props = writes(&out[0]);
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].name, PROP_CONCEPT_TYPE);
        assert_eq!(props[0].entry.value.as_string(), Some("movie"));
        assert_eq!(props[1].name, PROP_SOURCE);
        assert_eq!(props[1].key, "prov");
    }

    #[test]
    fn test_keyed_values_coexist() {
        let engine = engine();
        let mut out = Vec::new();
        let mut builder = engine.prepare_vertex(EntityKind::Movie, VertexId::new("M"));
        builder.add_keyed("genre", "Action", "Action");
        builder.add_keyed("genre", "Drama", "Drama");
        builder.add_keyed("genre", "Drama", "Drama");
        builder.save(&mut out);

        let genres: Vec<_> = writes(&out[0]).iter().filter(|w| w.name == "genre").collect();
        assert_eq!(genres.len(), 2);
        assert_eq!(genres[0].key, "prov_Action");
        assert_eq!(genres[1].key, "prov_Drama");
    }

    #[test]
    fn test_raw_is_not_indexed_and_has_data_row() {
        let engine = engine();
        let mut out = Vec::new();
        let mut builder = engine.prepare_vertex(EntityKind::Person, VertexId::new("P"));
        builder.raw(r#"{"id":7}"#);
        builder.save(&mut out);

        assert_eq!(out.len(), 2);
        let raw = writes(&out[0]).iter().find(|w| w.name == PROP_RAW).unwrap();
        assert!(!raw.entry.search_indexed);
        assert_eq!(out[1].kind(), Table::Data);
        assert_eq!(out[1].row, "P");
        match &out[1].op {
            MutationOp::PutData { bytes, .. } => assert_eq!(bytes, br#"{"id":7}"#),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_text_metadata() {
        let engine = engine();
        let mut out = Vec::new();
        let mut builder = engine.prepare_vertex(EntityKind::Movie, VertexId::new("M"));
        builder.text("Overview", "A movie.");
        builder.save(&mut out);

        let text = writes(&out[0]).iter().find(|w| w.name == PROP_TEXT).unwrap();
        assert_eq!(text.entry.metadata, PropertyMetadata::text("Overview"));
        assert_eq!(
            text.entry.value,
            PropertyValue::Stream { kind: StreamKind::Text, length: 8 }
        );
    }

    #[test]
    fn test_stub_skips_empty_title() {
        let engine = engine();
        let mut out = Vec::new();
        engine.stub(EntityKind::ProductionCompany, VertexId::new("C"), Some(""), &mut out);
        assert!(writes(&out[0]).iter().all(|w| w.name != PROP_TITLE));
    }
}

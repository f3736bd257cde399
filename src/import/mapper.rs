//! Entity builders for movies, persons and production companies
//!
//! Each builder produces the complete mutation set of one record or an
//! error; nothing is emitted for a record that fails part way through.

use super::classifier::{ClassifiedRecord, EntityRecord, RecordType};
use super::date::parse_flexible_date;
use super::error::{ImportError, ImportResult};
use super::ontology::{
    CompanyId, EntityKind, MovieId, PersonId, PROP_ALSO_KNOWN_AS, PROP_BIRTH_DATE, PROP_BUDGET,
    PROP_DEATH_DATE, PROP_GENRE, PROP_RELEASE_DATE, PROP_REVENUE, PROP_RUNTIME, PROP_TAG_LINE,
};
use super::record::{non_empty, CompanyRecord, MovieRecord, PersonRecord};
use super::relationship::RelationshipResolver;
use super::upsert::{EntityUpsertEngine, VertexBuilder};
use crate::graph::{Mutation, VertexId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-type "processed" counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Counter {
    MoviesProcessed,
    PersonsProcessed,
    ProductionCompaniesProcessed,
}

impl From<RecordType> for Counter {
    fn from(record_type: RecordType) -> Self {
        match record_type {
            RecordType::Movie => Counter::MoviesProcessed,
            RecordType::Person => Counter::PersonsProcessed,
            RecordType::ProductionCompany => Counter::ProductionCompaniesProcessed,
        }
    }
}

/// Everything one successfully mapped record produced
#[derive(Debug, Clone)]
pub struct RecordOutput {
    pub record_type: RecordType,
    pub id: i64,
    pub mutations: Vec<Mutation>,
    pub counter: Counter,
}

/// Maps classified records onto graph mutations
#[derive(Debug, Clone)]
pub struct RecordMapper {
    engine: EntityUpsertEngine,
}

impl RecordMapper {
    pub fn new(engine: EntityUpsertEngine) -> Self {
        Self { engine }
    }

    pub fn map(&self, record: ClassifiedRecord<'_>) -> ImportResult<RecordOutput> {
        let mut mutations = Vec::new();
        match &record.entity {
            EntityRecord::Movie(id, movie) => self.map_movie(*id, movie, record.raw, &mut mutations)?,
            EntityRecord::Person(id, person) => self.map_person(*id, person, record.raw, &mut mutations)?,
            EntityRecord::ProductionCompany(id, company) => {
                self.map_production_company(*id, company, &mut mutations)
            }
        }
        Ok(RecordOutput {
            record_type: record.record_type,
            id: record.id,
            counter: record.record_type.into(),
            mutations,
        })
    }

    /// Vertex with concept type, source, raw payload and title
    fn prepare_titled(&self, kind: EntityKind, id: VertexId, raw: &str, title: &str) -> VertexBuilder<'_> {
        let mut builder = self.engine.prepare_vertex(kind, id);
        builder.raw(raw).title(title);
        builder
    }

    pub fn map_movie(&self, movie_id: MovieId, movie: &MovieRecord, raw: &str, out: &mut Vec<Mutation>) -> ImportResult<()> {
        let title = movie
            .title
            .as_deref()
            .ok_or(ImportError::MissingRequiredField("title"))?;
        let mut m = self.prepare_titled(EntityKind::Movie, movie_id.vertex_id(), raw, title);

        if let Some(release_date) = non_empty(&movie.release_date) {
            m.add(PROP_RELEASE_DATE, parse_flexible_date("release_date", release_date)?);
        }

        for genre in &movie.genres {
            m.add_keyed(PROP_GENRE, &genre.name, genre.name.as_str());
        }

        if let Some(runtime) = movie.runtime.filter(|r| *r > 0.0) {
            m.add(PROP_RUNTIME, runtime * 60.0);
        }
        if let Some(revenue) = movie.revenue.filter(|r| *r > 0) {
            m.add(PROP_REVENUE, revenue);
        }
        if let Some(budget) = movie.budget.filter(|b| *b > 0) {
            m.add(PROP_BUDGET, budget);
        }
        if let Some(overview) = non_empty(&movie.overview) {
            m.text("Overview", overview);
        }
        if let Some(tagline) = non_empty(&movie.tagline) {
            m.add(PROP_TAG_LINE, tagline);
        }

        m.save(out);

        let edges = RelationshipResolver::new(&self.engine).movie_relationships(movie_id, movie, out);
        debug!("movie {} asserted {} edges", movie_id, edges.len());
        Ok(())
    }

    pub fn map_person(&self, person_id: PersonId, person: &PersonRecord, raw: &str, out: &mut Vec<Mutation>) -> ImportResult<()> {
        let name = person
            .name
            .as_deref()
            .ok_or(ImportError::MissingRequiredField("name"))?;
        let mut m = self.prepare_titled(EntityKind::Person, person_id.vertex_id(), raw, name);

        if let Some(biography) = non_empty(&person.biography) {
            m.text("Biography", biography);
        }
        if let Some(birthday) = non_empty(&person.birthday) {
            m.add(PROP_BIRTH_DATE, parse_flexible_date("birthday", birthday)?);
        }
        if let Some(deathday) = non_empty(&person.deathday) {
            m.add(PROP_DEATH_DATE, parse_flexible_date("deathday", deathday)?);
        }
        for (i, aka) in person.also_known_as.iter().enumerate() {
            m.add_keyed(PROP_ALSO_KNOWN_AS, format!("aka{}", i), aka.as_str());
        }

        m.save(out);

        let edges = RelationshipResolver::new(&self.engine).person_relationships(person_id, person, out)?;
        debug!("person {} asserted {} edges", person_id, edges.len());
        Ok(())
    }

    pub fn map_production_company(&self, company_id: CompanyId, company: &CompanyRecord, out: &mut Vec<Mutation>) {
        self.engine.stub(
            EntityKind::ProductionCompany,
            company_id.vertex_id(),
            non_empty(&company.name),
            out,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MutationOp, PropertyWrite, TableNames, PROP_TITLE};
    use crate::import::classifier::classify;

    fn mapper() -> RecordMapper {
        RecordMapper::new(EntityUpsertEngine::new(TableNames::with_prefix("t"), "src", "prov"))
    }

    fn map(line: &str, record_type: RecordType) -> ImportResult<RecordOutput> {
        mapper().map(classify(line, record_type)?)
    }

    fn vertex_writes<'a>(out: &'a RecordOutput, row: &str) -> &'a [PropertyWrite] {
        out.mutations
            .iter()
            .find_map(|m| match &m.op {
                MutationOp::UpsertVertex { properties } if m.row == row => Some(properties.as_slice()),
                _ => None,
            })
            .expect("vertex mutation")
    }

    fn names(writes: &[PropertyWrite]) -> Vec<&str> {
        writes.iter().map(|w| w.name.as_str()).collect()
    }

    #[test]
    fn test_movie_requires_title() {
        let err = map(r#"{"id":1}"#, RecordType::Movie).unwrap_err();
        assert_eq!(err, ImportError::MissingRequiredField("title"));
    }

    #[test]
    fn test_person_requires_name() {
        let err = map(r#"{"id":1,"title":"x"}"#, RecordType::Person).unwrap_err();
        assert_eq!(err, ImportError::MissingRequiredField("name"));
    }

    #[test]
    fn test_non_positive_numbers_are_omitted() {
        let out = map(
            r#"{"id":1,"title":"x","runtime":0,"revenue":-5,"budget":0}"#,
            RecordType::Movie,
        )
        .unwrap();
        let props = names(vertex_writes(&out, "MOVIEDB_MOVIE_1"));
        assert!(!props.contains(&PROP_RUNTIME));
        assert!(!props.contains(&PROP_REVENUE));
        assert!(!props.contains(&PROP_BUDGET));
    }

    #[test]
    fn test_positive_numbers_are_stored() {
        let out = map(
            r#"{"id":1,"title":"x","runtime":1.5,"revenue":10,"budget":20,"tagline":"t"}"#,
            RecordType::Movie,
        )
        .unwrap();
        let writes = vertex_writes(&out, "MOVIEDB_MOVIE_1");
        let get = |name: &str| writes.iter().find(|w| w.name == name).map(|w| &w.entry.value);
        assert_eq!(get(PROP_RUNTIME).and_then(|v| v.as_float()), Some(90.0));
        assert_eq!(get(PROP_REVENUE).and_then(|v| v.as_integer()), Some(10));
        assert_eq!(get(PROP_BUDGET).and_then(|v| v.as_integer()), Some(20));
        assert_eq!(get(PROP_TAG_LINE).and_then(|v| v.as_string()), Some("t"));
    }

    #[test]
    fn test_empty_release_date_is_absent() {
        let out = map(r#"{"id":1,"title":"x","release_date":""}"#, RecordType::Movie).unwrap();
        assert!(!names(vertex_writes(&out, "MOVIEDB_MOVIE_1")).contains(&PROP_RELEASE_DATE));
    }

    #[test]
    fn test_bad_birthday_aborts_person() {
        let line = r#"{"id":7,"name":"A","birthday":"1970-02-30",
            "combined_credits":{"cast":[{"media_type":"movie","id":100}]}}"#;
        let err = map(line, RecordType::Person).unwrap_err();
        assert!(matches!(err, ImportError::UnparsableDate { field: "birthday", .. }));
    }

    #[test]
    fn test_aliases_use_index_keys() {
        let out = map(
            r#"{"id":7,"name":"A","also_known_as":["B","B","C"]}"#,
            RecordType::Person,
        )
        .unwrap();
        let akas: Vec<_> = vertex_writes(&out, "MOVIEDB_PERSON_7")
            .iter()
            .filter(|w| w.name == PROP_ALSO_KNOWN_AS)
            .map(|w| w.key.as_str())
            .collect();
        assert_eq!(akas, vec!["prov_aka0", "prov_aka1", "prov_aka2"]);
    }

    #[test]
    fn test_company_with_name() {
        let out = map(r#"{"id":9,"name":"Studio"}"#, RecordType::ProductionCompany).unwrap();
        assert_eq!(out.counter, Counter::ProductionCompaniesProcessed);
        let writes = vertex_writes(&out, "MOVIEDB_PRODCO_9");
        assert!(names(writes).contains(&PROP_TITLE));
    }
}

//! Relationship derivation
//!
//! Edges are derived from whichever record mentions both endpoints. The
//! far endpoint is written as a stub vertex so the edge never dangles once
//! all mutations land; the stub is enriched later by that entity's own
//! record, if one is processed.

use super::ontology::{
    produced_edge_id, starred_in_edge_id, CompanyId, EntityKind, MovieId, PersonId,
    EDGE_LABEL_PRODUCED, EDGE_LABEL_STARRED_IN,
};
use super::error::ImportResult;
use super::record::{non_empty, CastMember, CompanyRef, CreditedWork, MovieRecord, PersonRecord};
use super::upsert::EntityUpsertEngine;
use crate::graph::{EdgeId, EdgeLabel, Mutation, MutationOp, VertexId};
use tracing::trace;

pub struct RelationshipResolver<'e> {
    engine: &'e EntityUpsertEngine,
}

impl<'e> RelationshipResolver<'e> {
    pub fn new(engine: &'e EntityUpsertEngine) -> Self {
        Self { engine }
    }

    fn edge(&self, id: EdgeId, out_vertex: VertexId, in_vertex: VertexId, label: &str, out: &mut Vec<Mutation>) {
        trace!("edge {} {} -> {}", id, out_vertex, in_vertex);
        out.push(Mutation::new(
            self.engine.tables(),
            id.as_str(),
            MutationOp::UpsertEdge {
                label: EdgeLabel::new(label),
                out_vertex,
                in_vertex,
            },
        ));
    }

    /// Person -[starredIn]-> Movie
    pub fn starred_in(&self, person: PersonId, movie: MovieId, out: &mut Vec<Mutation>) -> EdgeId {
        let id = starred_in_edge_id(person, movie);
        self.edge(id.clone(), person.vertex_id(), movie.vertex_id(), EDGE_LABEL_STARRED_IN, out);
        id
    }

    /// Company -[produced]-> Movie
    pub fn produced(&self, company: CompanyId, movie: MovieId, out: &mut Vec<Mutation>) -> EdgeId {
        let id = produced_edge_id(company, movie);
        self.edge(id.clone(), company.vertex_id(), movie.vertex_id(), EDGE_LABEL_PRODUCED, out);
        id
    }

    /// Stub person + StarredIn edge for one cast entry of a movie
    pub fn cast_member(&self, movie: MovieId, cast: &CastMember, out: &mut Vec<Mutation>) -> EdgeId {
        let person = PersonId(cast.id);
        self.engine
            .stub(EntityKind::Person, person.vertex_id(), non_empty(&cast.name), out);
        self.starred_in(person, movie, out)
    }

    /// Stub company + Produced edge for one production company of a movie
    pub fn production_company(&self, movie: MovieId, company: &CompanyRef, out: &mut Vec<Mutation>) -> EdgeId {
        let company_id = CompanyId(company.id);
        self.engine.stub(
            EntityKind::ProductionCompany,
            company_id.vertex_id(),
            non_empty(&company.name),
            out,
        );
        self.produced(company_id, movie, out)
    }

    /// Stub movie + StarredIn edge for one movie in a person's filmography
    pub fn credited_work(&self, person: PersonId, work: &CreditedWork, out: &mut Vec<Mutation>) -> EdgeId {
        let movie = MovieId(work.id);
        self.engine
            .stub(EntityKind::Movie, movie.vertex_id(), non_empty(&work.title), out);
        self.starred_in(person, movie, out)
    }

    /// All edges a movie record asserts: its cast and its producers
    pub fn movie_relationships(&self, movie: MovieId, record: &MovieRecord, out: &mut Vec<Mutation>) -> Vec<EdgeId> {
        let cast = record.credits.iter().flat_map(|c| c.cast.iter());
        let mut edges: Vec<EdgeId> = cast.map(|member| self.cast_member(movie, member, out)).collect();
        edges.extend(
            record
                .production_companies
                .iter()
                .map(|company| self.production_company(movie, company, out)),
        );
        edges
    }

    /// All edges a person record asserts: its movie credits. Fails if a
    /// movie entry cannot be decoded.
    pub fn person_relationships(
        &self,
        person: PersonId,
        record: &PersonRecord,
        out: &mut Vec<Mutation>,
    ) -> ImportResult<Vec<EdgeId>> {
        let works = match &record.combined_credits {
            Some(credits) => credits.movies()?,
            None => Vec::new(),
        };
        Ok(works
            .iter()
            .map(|work| self.credited_work(person, work, out))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Table, TableNames};

    fn engine() -> EntityUpsertEngine {
        EntityUpsertEngine::new(TableNames::with_prefix("t"), "src", "prov")
    }

    #[test]
    fn test_edge_id_is_direction_independent() {
        let engine = engine();
        let resolver = RelationshipResolver::new(&engine);

        let mut from_movie = Vec::new();
        let a = resolver.cast_member(MovieId(100), &CastMember { id: 7, name: Some("A".into()) }, &mut from_movie);

        let mut from_person = Vec::new();
        let b = resolver
            .credited_work(
                PersonId(7),
                &CreditedWork { id: 100, title: Some("X".into()) },
                &mut from_person,
            );

        assert_eq!(a, b);
        let edge_a = from_movie.iter().find(|m| m.kind() == Table::Edges).unwrap();
        let edge_b = from_person.iter().find(|m| m.kind() == Table::Edges).unwrap();
        assert_eq!(edge_a, edge_b);
    }

    #[test]
    fn test_tv_credits_are_ignored() {
        let engine = engine();
        let resolver = RelationshipResolver::new(&engine);
        let mut out = Vec::new();
        let person: PersonRecord = serde_json::from_value(serde_json::json!({
            "name": "A",
            "combined_credits": {"cast": [
                {"media_type": "tv", "name": "Show"},
                {"media_type": "tv", "id": 55},
                {"id": 56}
            ]}
        }))
        .unwrap();
        let edges = resolver.person_relationships(PersonId(7), &person, &mut out).unwrap();
        assert!(edges.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn test_production_company_edge() {
        let engine = engine();
        let resolver = RelationshipResolver::new(&engine);
        let mut out = Vec::new();
        let id = resolver.production_company(MovieId(100), &CompanyRef { id: 9, name: None }, &mut out);

        assert_eq!(id.as_str(), "MOVIEDB_PRODUCED_9_100");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].row, "MOVIEDB_PRODCO_9");
        match &out[1].op {
            MutationOp::UpsertEdge { label, out_vertex, in_vertex } => {
                assert_eq!(label.as_str(), EDGE_LABEL_PRODUCED);
                assert_eq!(out_vertex.as_str(), "MOVIEDB_PRODCO_9");
                assert_eq!(in_vertex.as_str(), "MOVIEDB_MOVIE_100");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

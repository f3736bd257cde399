//! Identity resolution and ontology names for the movie domain
//!
//! Internal ids are pure functions of `(kind, external id)`. Every worker,
//! in every process, computes the same id for the same entity, which is
//! what lets independent workers converge without sharing state.
//!
//! Edge ids take typed endpoint ids, so the StarredIn id for a
//! (person, movie) pair is the same whether it was discovered from the
//! movie's cast list or from the person's filmography.

use crate::graph::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CONCEPT_TYPE_MOVIE: &str = "movie";
pub const CONCEPT_TYPE_PERSON: &str = "person";
pub const CONCEPT_TYPE_PRODUCTION_COMPANY: &str = "productionCompany";

pub const PROP_RELEASE_DATE: &str = "releaseDate";
pub const PROP_GENRE: &str = "genre";
pub const PROP_RUNTIME: &str = "runtime";
pub const PROP_REVENUE: &str = "revenue";
pub const PROP_BUDGET: &str = "budget";
pub const PROP_TAG_LINE: &str = "tagLine";
pub const PROP_BIRTH_DATE: &str = "birthDate";
pub const PROP_DEATH_DATE: &str = "deathDate";
pub const PROP_ALSO_KNOWN_AS: &str = "alsoKnownAs";

pub const EDGE_LABEL_STARRED_IN: &str = "starredIn";
pub const EDGE_LABEL_PRODUCED: &str = "produced";

const ID_PREFIX: &str = "MOVIEDB";

/// Kind of entity a vertex represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Movie,
    Person,
    ProductionCompany,
}

impl EntityKind {
    /// Segment used inside internal vertex ids
    fn id_segment(&self) -> &'static str {
        match self {
            EntityKind::Movie => "MOVIE",
            EntityKind::Person => "PERSON",
            EntityKind::ProductionCompany => "PRODCO",
        }
    }

    pub fn concept_type(&self) -> &'static str {
        match self {
            EntityKind::Movie => CONCEPT_TYPE_MOVIE,
            EntityKind::Person => CONCEPT_TYPE_PERSON,
            EntityKind::ProductionCompany => CONCEPT_TYPE_PRODUCTION_COMPANY,
        }
    }

    /// Internal vertex id for an external id of this kind
    pub fn vertex_id(&self, external_id: i64) -> VertexId {
        VertexId::new(format!("{}_{}_{}", ID_PREFIX, self.id_segment(), external_id))
    }
}

macro_rules! external_id {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            pub fn vertex_id(&self) -> VertexId {
                $kind.vertex_id(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }
    };
}

external_id!(
    /// Source-system id of a movie
    MovieId => EntityKind::Movie
);
external_id!(
    /// Source-system id of a person
    PersonId => EntityKind::Person
);
external_id!(
    /// Source-system id of a production company
    CompanyId => EntityKind::ProductionCompany
);

/// Canonical id of the Person -> Movie "starred in" edge
pub fn starred_in_edge_id(person: PersonId, movie: MovieId) -> EdgeId {
    EdgeId::new(format!("{}_STARRED_IN_{}_{}", ID_PREFIX, person, movie))
}

/// Canonical id of the Company -> Movie "produced" edge
pub fn produced_edge_id(company: CompanyId, movie: MovieId) -> EdgeId {
    EdgeId::new(format!("{}_PRODUCED_{}_{}", ID_PREFIX, company, movie))
}

//! Record classification
//!
//! Turns a raw JSON line plus its record-type tag into a typed entity
//! record. The external `id` is extracted before anything else so every
//! later failure can be reported with its `"{type}:{id}"` status.

use super::error::{ImportError, ImportResult};
use super::ontology::{CompanyId, EntityKind, MovieId, PersonId};
use super::record::{CompanyRecord, MovieRecord, PersonRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Input record-type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    Movie,
    Person,
    ProductionCompany,
}

impl RecordType {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            RecordType::Movie => EntityKind::Movie,
            RecordType::Person => EntityKind::Person,
            RecordType::ProductionCompany => EntityKind::ProductionCompany,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordType::Movie => "MOVIE",
            RecordType::Person => "PERSON",
            RecordType::ProductionCompany => "PRODUCTION_COMPANY",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for RecordType {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "movie" => Ok(RecordType::Movie),
            "person" => Ok(RecordType::Person),
            "company" | "production_company" | "productioncompany" => {
                Ok(RecordType::ProductionCompany)
            }
            other => Err(ImportError::MalformedRecord(format!(
                "unknown record type: {:?}",
                other
            ))),
        }
    }
}

/// Decoded record, dispatched by type
#[derive(Debug, Clone)]
pub enum EntityRecord {
    Movie(MovieId, MovieRecord),
    Person(PersonId, PersonRecord),
    ProductionCompany(CompanyId, CompanyRecord),
}

/// A record that passed classification
#[derive(Debug, Clone)]
pub struct ClassifiedRecord<'a> {
    pub record_type: RecordType,
    pub id: i64,
    pub entity: EntityRecord,
    /// Original line, kept verbatim for the raw payload property
    pub raw: &'a str,
}

/// Status indicator of the form `"{recordType}:{id}"`
pub fn status(record_type: RecordType, id: i64) -> String {
    format!("{}:{}", record_type, id)
}

/// Extract the mandatory integer `id` of a parsed record
pub fn extract_id(json: &Value) -> ImportResult<i64> {
    match json.get("id") {
        Some(id) => id
            .as_i64()
            .ok_or_else(|| ImportError::MalformedRecord(format!("non-integer id: {}", id))),
        None => Err(ImportError::MalformedRecord("missing id".to_string())),
    }
}

/// Parse `line` far enough to know its id
pub fn identify(line: &str) -> ImportResult<(Value, i64)> {
    let json: Value = serde_json::from_str(line)?;
    if !json.is_object() {
        return Err(ImportError::MalformedRecord("record is not a JSON object".to_string()));
    }
    let id = extract_id(&json)?;
    Ok((json, id))
}

/// Decode an identified record into its typed schema
pub fn decode(line: &str, record_type: RecordType, json: Value, id: i64) -> ImportResult<ClassifiedRecord<'_>> {
    let entity = match record_type {
        RecordType::Movie => EntityRecord::Movie(MovieId(id), serde_json::from_value(json)?),
        RecordType::Person => EntityRecord::Person(PersonId(id), serde_json::from_value(json)?),
        RecordType::ProductionCompany => {
            EntityRecord::ProductionCompany(CompanyId(id), serde_json::from_value(json)?)
        }
    };

    Ok(ClassifiedRecord {
        record_type,
        id,
        entity,
        raw: line,
    })
}

/// Parse `line` and decode it as `record_type`
pub fn classify(line: &str, record_type: RecordType) -> ImportResult<ClassifiedRecord<'_>> {
    let (json, id) = identify(line)?;
    decode(line, record_type, json, id)
}

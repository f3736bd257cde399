//! Property value types for graph vertices
//!
//! Properties are multi-valued: a property name maps to a set of entries,
//! each addressed by a provenance key. Two writers asserting the same
//! name under different keys both survive; a write under an existing key
//! replaces only that entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Concept type of the entity a vertex represents
pub const PROP_CONCEPT_TYPE: &str = "conceptType";
/// Source system the value was imported from
pub const PROP_SOURCE: &str = "source";
/// Verbatim source payload
pub const PROP_RAW: &str = "raw";
/// Display title
pub const PROP_TITLE: &str = "title";
/// Free text body (overview, biography)
pub const PROP_TEXT: &str = "text";

/// Precision of a parsed date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatePrecision {
    Day,
    Year,
}

/// Kind of payload held by a streamed (blob) property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    /// UTF-8 text (overview, biography)
    Text,
    /// Opaque bytes (raw JSON payload)
    Binary,
}

/// Property value type
///
/// Streamed values only carry their length and kind here; the bytes travel
/// in the data table keyed by the owning vertex id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Date {
        date: NaiveDate,
        precision: DatePrecision,
    },
    Stream {
        kind: StreamKind,
        length: u64,
    },
}

impl PropertyValue {
    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get date and its precision if this is a date
    pub fn as_date(&self) -> Option<(NaiveDate, DatePrecision)> {
        match self {
            PropertyValue::Date { date, precision } => Some((*date, *precision)),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Date { date, precision: DatePrecision::Day } => {
                write!(f, "{}", date.format("%Y-%m-%d"))
            }
            PropertyValue::Date { date, precision: DatePrecision::Year } => {
                write!(f, "{}", date.format("%Y"))
            }
            PropertyValue::Stream { kind, length } => write!(f, "Stream({:?}, {} bytes)", kind, length),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

/// Descriptive metadata attached to a property entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl PropertyMetadata {
    /// Metadata for a plain-text blob with a human readable description
    pub fn text(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            mime_type: Some("text/plain".to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.mime_type.is_none()
    }
}

/// One value of a property, as asserted under a single provenance key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub value: PropertyValue,
    #[serde(default, skip_serializing_if = "PropertyMetadata::is_empty")]
    pub metadata: PropertyMetadata,
    /// Whether the search index should see this value
    pub search_indexed: bool,
}

impl PropertyEntry {
    pub fn new(value: impl Into<PropertyValue>) -> Self {
        Self {
            value: value.into(),
            metadata: PropertyMetadata::default(),
            search_indexed: true,
        }
    }
}

/// Multi-valued property storage: name -> (provenance key -> entry)
///
/// Upsert is set union keyed by `(name, key)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    entries: BTreeMap<String, BTreeMap<String, PropertyEntry>>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry at `(name, key)`.
    ///
    /// Returns `true` when the set changed.
    pub fn upsert(
        &mut self,
        name: impl Into<String>,
        key: impl Into<String>,
        entry: PropertyEntry,
    ) -> bool {
        let slot = self.entries.entry(name.into()).or_default();
        match slot.insert(key.into(), entry.clone()) {
            Some(previous) => previous != entry,
            None => true,
        }
    }

    /// Union another set into this one. Entries of `other` win on key clashes.
    pub fn union(&mut self, other: PropertySet) -> bool {
        let mut changed = false;
        for (name, keyed) in other.entries {
            for (key, entry) in keyed {
                changed |= self.upsert(name.clone(), key, entry);
            }
        }
        changed
    }

    /// Entry stored at `(name, key)`
    pub fn get(&self, name: &str, key: &str) -> Option<&PropertyEntry> {
        self.entries.get(name).and_then(|keyed| keyed.get(key))
    }

    /// All values stored under `name`, ordered by provenance key
    pub fn values(&self, name: &str) -> Vec<&PropertyValue> {
        self.entries
            .get(name)
            .map(|keyed| keyed.values().map(|e| &e.value).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|keyed| !keyed.is_empty())
    }

    /// Total number of entries across all names
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

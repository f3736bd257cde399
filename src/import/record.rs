//! Typed schemas for the three record kinds
//!
//! Required-vs-optional is explicit: optional fields are `Option` and
//! lists default to empty when absent or `null`. The external `id` is not
//! part of these structs; the classifier extracts it first.

use super::error::{ImportError, ImportResult};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat `Some("")` the same as absent
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieRecord {
    pub title: Option<String>,
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    /// Minutes
    pub runtime: Option<f64>,
    pub revenue: Option<i64>,
    pub budget: Option<i64>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub credits: Option<Credits>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<CompanyRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<CastMember>,
}

/// Entry of a movie's cast list
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: Option<String>,
}

/// Entry of a movie's production company list
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyRef {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonRecord {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub also_known_as: Vec<String>,
    pub combined_credits: Option<CombinedCredits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CombinedCredits {
    /// Movie and tv entries, kept undecoded until the media type is known
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<Value>,
}

impl CombinedCredits {
    /// Decode the movie entries. Other media types are skipped without
    /// looking at any of their fields.
    pub fn movies(&self) -> ImportResult<Vec<CreditedWork>> {
        self.cast
            .iter()
            .filter(|entry| is_movie_entry(entry))
            .map(|entry| CreditedWork::deserialize(entry).map_err(ImportError::from))
            .collect()
    }
}

fn is_movie_entry(entry: &Value) -> bool {
    entry.get("media_type").and_then(Value::as_str) == Some("movie")
}

/// Movie entry of a person's combined credits
#[derive(Debug, Clone, Deserialize)]
pub struct CreditedWork {
    pub id: i64,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyRecord {
    pub name: Option<String>,
}

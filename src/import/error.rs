//! Error taxonomy for record import
//!
//! Every variant is caught at the single-record boundary; none of them is
//! fatal to a batch.

use crate::graph::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a single record was skipped
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    /// JSON unparsable, `id` missing or non-integer, or the record does not
    /// fit its schema
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A required field (`title` for movies, `name` for persons) is absent
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// A present date field matched neither `YYYY-MM-DD` nor `YYYY`
    #[error("Unparsable date in {field}: {value:?}")]
    UnparsableDate { field: &'static str, value: String },

    /// Anything else that went wrong while mapping the record
    #[error("Unexpected failure: {0}")]
    UnexpectedRuntimeFailure(String),
}

impl ImportError {
    pub fn reason(&self) -> SkipReason {
        match self {
            ImportError::MalformedRecord(_) => SkipReason::MalformedRecord,
            ImportError::MissingRequiredField(_) => SkipReason::MissingRequiredField,
            ImportError::UnparsableDate { .. } => SkipReason::UnparsableDate,
            ImportError::UnexpectedRuntimeFailure(_) => SkipReason::UnexpectedRuntimeFailure,
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::MalformedRecord(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

/// Skip category, used as a counter key in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkipReason {
    MalformedRecord,
    MissingRequiredField,
    UnparsableDate,
    UnexpectedRuntimeFailure,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkipReason::MalformedRecord => "malformed record",
            SkipReason::MissingRequiredField => "missing required field",
            SkipReason::UnparsableDate => "unparsable date",
            SkipReason::UnexpectedRuntimeFailure => "unexpected failure",
        };
        write!(f, "{}", name)
    }
}

/// Errors that stop a whole pipeline run (never caused by a single record)
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The mutation sink rejected a write
    #[error("Sink error: {0}")]
    Sink(#[from] StoreError),

    /// The worker pool could not be started
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_mapping() {
        assert_eq!(
            ImportError::MalformedRecord("x".into()).reason(),
            SkipReason::MalformedRecord
        );
        assert_eq!(
            ImportError::MissingRequiredField("title").reason(),
            SkipReason::MissingRequiredField
        );
        let err = ImportError::UnparsableDate { field: "release_date", value: "1999-13-40".into() };
        assert_eq!(err.reason(), SkipReason::UnparsableDate);
        assert_eq!(err.to_string(), "Unparsable date in release_date: \"1999-13-40\"");
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err: ImportError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.reason(), SkipReason::MalformedRecord);
    }
}

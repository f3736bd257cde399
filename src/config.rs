//! Import configuration
//!
//! Loaded from YAML; every field has a default so a partial file (or no
//! file at all) is valid.

use crate::graph::TableNames;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Import run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Value written to every vertex's `source` property
    pub source: String,
    /// Provenance key attached to every property this import asserts
    pub provenance_key: String,
    /// Prefix of the vertex/edge/data table names
    pub table_prefix: String,
    /// Number of parallel workers
    pub workers: usize,
    /// Records per worker batch
    pub batch_size: usize,
    /// Log level for the binary (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            source: "TheMovieDb.org".to_string(),
            provenance_key: "moviegraph.import".to_string(),
            table_prefix: "moviegraph".to_string(),
            workers: 4,
            batch_size: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl ImportConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: ImportConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {:?}", path);
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.source.is_empty() {
            return Err(ConfigError::Invalid("source must not be empty".to_string()));
        }
        if self.provenance_key.is_empty() {
            return Err(ConfigError::Invalid("provenance_key must not be empty".to_string()));
        }
        if self.table_prefix.is_empty() {
            return Err(ConfigError::Invalid("table_prefix must not be empty".to_string()));
        }
        if self.workers == 0 || self.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "workers and batch_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tables(&self) -> TableNames {
        TableNames::with_prefix(&self.table_prefix)
    }
}

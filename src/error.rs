//! Error types for the fallible edges of the crate: configuration loading
//! and the in-memory store. The interaction loop itself never fails.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::series::SeriesId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config format {0:?} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(Option<String>),
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("unknown series {0}")]
    UnknownSeries(SeriesId),
    #[error("series {series_id} has no epoch {epoch_index}")]
    UnknownEpoch {
        series_id: SeriesId,
        epoch_index: usize,
    },
}

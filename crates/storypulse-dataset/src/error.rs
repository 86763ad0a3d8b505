use chrono::{DateTime, Utc};
use thiserror::Error;

use storypulse_newsapi::NewsApiError;

/// Errors produced by the retrieval pipeline and dataset container.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error for {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A story log exists but one of its lines failed to parse. Surfaced
    /// rather than treated as "no checkpoint" so corruption is never masked
    /// as a fresh start.
    #[error("corrupt story log {path} at line {line}: {source}")]
    CorruptLog {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A planned period has no entry in the time series. The series and the
    /// plan were built from the same range and width and must agree exactly.
    #[error("no volume entry for planned period starting {timestamp}")]
    MissingVolume { timestamp: DateTime<Utc> },

    /// The checkpoint recovered from the log matches no planned period start:
    /// the log and the current time series disagree on period alignment.
    #[error("checkpoint {checkpoint} does not match any planned period start")]
    CheckpointMismatch { checkpoint: DateTime<Utc> },

    #[error("unsupported period '{0}'")]
    UnsupportedPeriod(String),

    /// The user declined the destructive-overwrite prompt.
    #[error("refusing to overwrite existing dataset at {path}")]
    OverwriteDeclined { path: String },

    #[error(transparent)]
    Api(#[from] NewsApiError),
}

//! Shared configuration and signal descriptors for storypulse.

use thiserror::Error;

mod app_config;
mod config;
mod signals;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use signals::{load_signals_csv, read_signals_csv, SignalConfig};

/// Errors produced while loading configuration or signal sources.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read signals file {path}: {source}")]
    SignalsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse signals file: {0}")]
    SignalsFileCsv(#[from] csv::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

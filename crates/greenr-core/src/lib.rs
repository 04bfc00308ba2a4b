//! Shared domain types and configuration for the Green'r Foot classifier.

mod app_config;
mod config;
pub mod dataset;
pub mod labels;
pub mod models;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{DatasetError, LabeledExample, LabelCount, ReferenceTable};
pub use labels::{LabelParseError, SentimentLabel};
pub use models::{load_models_manifest, ModelSpec, ModelsFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read models manifest at {path}: {source}")]
    ManifestIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse models manifest: {0}")]
    ManifestParse(#[from] serde_yaml::Error),

    #[error("models manifest validation failed: {0}")]
    Validation(String),
}

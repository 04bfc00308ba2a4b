use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Path to `models.yaml`; artifact paths inside it resolve relative to its directory.
    pub models_path: PathBuf,
    /// Path to the labeled reference CSV (`sentiment`, `message`, optional `tweetid`).
    pub dataset_path: PathBuf,
    /// Upper bound applied to `limit` when listing reference rows.
    pub examples_limit_max: usize,
}

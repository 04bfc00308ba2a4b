use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The artifact path does not exist.
    #[error("artifact not found: {path}")]
    ArtifactNotFound { path: String },

    /// The artifact exists but could not be decoded into a usable model object.
    #[error("artifact at {path} is corrupt: {reason}")]
    ArtifactCorrupt { path: String, reason: String },

    #[error("failed to read artifact at {path}: {source}")]
    ArtifactIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A feature matrix reached a classifier trained on a different feature space.
    #[error("feature width mismatch: classifier expects {expected} features, got {actual}")]
    FeatureWidthMismatch { expected: usize, actual: usize },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unknown model: {0}")]
    UnknownModel(String),
}

impl ClassifierError {
    /// Whether the error concerns a single request rather than the loaded artifacts.
    #[must_use]
    pub fn is_per_request(&self) -> bool {
        matches!(
            self,
            ClassifierError::FeatureWidthMismatch { .. }
                | ClassifierError::Inference(_)
                | ClassifierError::UnknownModel(_)
        )
    }
}

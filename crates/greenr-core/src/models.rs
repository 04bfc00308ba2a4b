use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One vectorizer/classifier pair as declared in `models.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
    /// Hex SHA-256 the vectorizer file must hash to, when pinned.
    pub vectorizer_sha256: Option<String>,
    /// Hex SHA-256 the classifier file must hash to, when pinned.
    pub classifier_sha256: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsFile {
    pub default: String,
    pub models: Vec<ModelSpec>,
    /// Directory the manifest was read from; artifact paths resolve against it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl ModelsFile {
    /// Resolve an artifact path declared in the manifest.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Load and validate the model manifest from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_models_manifest(path: &Path) -> Result<ModelsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ManifestIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut models_file: ModelsFile = serde_yaml::from_str(&content)?;
    models_file.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    validate_models(&models_file)?;

    Ok(models_file)
}

fn validate_models(models_file: &ModelsFile) -> Result<(), ConfigError> {
    if models_file.models.is_empty() {
        return Err(ConfigError::Validation(
            "at least one model must be declared".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();

    for model in &models_file.models {
        if model.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "model id must be non-empty".to_string(),
            ));
        }

        if !model
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "model id '{}' may only contain lowercase ascii letters, digits, '-' and '_'",
                model.id
            )));
        }

        if model.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "model '{}' must have a non-empty name",
                model.id
            )));
        }

        for digest in [&model.vectorizer_sha256, &model.classifier_sha256]
            .into_iter()
            .flatten()
        {
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Validation(format!(
                    "model '{}' has a malformed sha256 pin '{digest}'",
                    model.id
                )));
            }
        }

        if !seen_ids.insert(model.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate model id: '{}'",
                model.id
            )));
        }
    }

    if !seen_ids.contains(models_file.default.as_str()) {
        return Err(ConfigError::Validation(format!(
            "default model '{}' is not declared",
            models_file.default
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;

//! Vectorizer/classifier pairs and the registry holding them for the process lifetime.

use std::path::Path;

use greenr_core::{ModelSpec, ModelsFile, SentimentLabel};

use crate::artifact::load_artifact;
use crate::error::ClassifierError;
use crate::linear::{ClassifierKind, LinearClassifier};
use crate::vectorizer::TfidfVectorizer;

/// SHA-256 digests of the files a model was loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprints {
    pub vectorizer: Option<String>,
    pub classifier: Option<String>,
}

/// A vectorizer bound to the classifier trained on its feature space.
///
/// The pairing is checked once in [`Model::new`]; a `Model` whose widths
/// disagree cannot be constructed.
#[derive(Debug, Clone)]
pub struct Model {
    id: String,
    name: String,
    description: Option<String>,
    vectorizer: TfidfVectorizer,
    classifier: LinearClassifier,
    fingerprints: Fingerprints,
}

impl Model {
    /// Bind a vectorizer and classifier under a model id.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::FeatureWidthMismatch`] when the vectorizer
    /// width differs from the classifier's feature count.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        vectorizer: TfidfVectorizer,
        classifier: LinearClassifier,
    ) -> Result<Self, ClassifierError> {
        if vectorizer.width() != classifier.n_features() {
            return Err(ClassifierError::FeatureWidthMismatch {
                expected: classifier.n_features(),
                actual: vectorizer.width(),
            });
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            description: None,
            vectorizer,
            classifier,
            fingerprints: Fingerprints::default(),
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn with_fingerprints(mut self, fingerprints: Fingerprints) -> Self {
        self.fingerprints = fingerprints;
        self
    }

    /// Load both artifacts of a manifest entry and bind them.
    ///
    /// # Errors
    ///
    /// Propagates loader errors for either artifact and
    /// [`ClassifierError::FeatureWidthMismatch`] for an incompatible pair.
    pub fn load(spec: &ModelSpec, manifest: &ModelsFile) -> Result<Self, ClassifierError> {
        let vectorizer_path = manifest.resolve(&spec.vectorizer);
        let classifier_path = manifest.resolve(&spec.classifier);

        let vectorizer = load_artifact::<TfidfVectorizer>(
            &vectorizer_path,
            spec.vectorizer_sha256.as_deref(),
        )?;
        let classifier = load_artifact::<LinearClassifier>(
            &classifier_path,
            spec.classifier_sha256.as_deref(),
        )?;

        let model = Self::new(&spec.id, &spec.name, vectorizer.value, classifier.value)
            .map_err(|e| {
                tracing::error!(
                    model = %spec.id,
                    vectorizer = %vectorizer_path.display(),
                    classifier = %classifier_path.display(),
                    error = %e,
                    "vectorizer and classifier were not trained together"
                );
                e
            })?;

        Ok(model
            .with_description(spec.description.clone())
            .with_fingerprints(Fingerprints {
                vectorizer: Some(vectorizer.sha256),
                classifier: Some(classifier.sha256),
            }))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> ClassifierKind {
        self.classifier.kind()
    }

    #[must_use]
    pub fn feature_width(&self) -> usize {
        self.vectorizer.width()
    }

    #[must_use]
    pub fn classes(&self) -> &[SentimentLabel] {
        self.classifier.classes()
    }

    #[must_use]
    pub fn fingerprints(&self) -> &Fingerprints {
        &self.fingerprints
    }

    #[must_use]
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    #[must_use]
    pub fn classifier(&self) -> &LinearClassifier {
        &self.classifier
    }
}

/// Every model declared in the manifest, loaded eagerly and never mutated.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Vec<Model>,
    default_id: String,
}

impl ModelRegistry {
    /// Build a registry from already-constructed models.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::UnknownModel`] if `default_id` names none of `models`.
    pub fn new(models: Vec<Model>, default_id: impl Into<String>) -> Result<Self, ClassifierError> {
        let default_id = default_id.into();
        if !models.iter().any(|m| m.id == default_id) {
            return Err(ClassifierError::UnknownModel(default_id));
        }
        Ok(Self { models, default_id })
    }

    /// Load every model declared in a manifest.
    ///
    /// # Errors
    ///
    /// Fails on the first artifact that cannot be loaded; no partial registry is returned.
    pub fn load(manifest: &ModelsFile) -> Result<Self, ClassifierError> {
        let mut models = Vec::with_capacity(manifest.models.len());
        for spec in &manifest.models {
            let model = Model::load(spec, manifest)?;
            tracing::info!(
                model = %model.id,
                kind = %model.kind(),
                features = model.feature_width(),
                "model loaded"
            );
            models.push(model);
        }
        Self::new(models, manifest.default.clone())
    }

    /// Read the manifest at `path` and load every model it declares.
    ///
    /// # Errors
    ///
    /// Manifest problems surface as [`ClassifierError::ArtifactNotFound`] or
    /// [`ClassifierError::ArtifactCorrupt`] for the manifest path itself.
    pub fn load_from_manifest(path: &Path) -> Result<Self, ClassifierError> {
        let manifest = greenr_core::load_models_manifest(path).map_err(|e| match e {
            greenr_core::ConfigError::ManifestIo { ref source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                ClassifierError::ArtifactNotFound {
                    path: path.display().to_string(),
                }
            }
            other => ClassifierError::ArtifactCorrupt {
                path: path.display().to_string(),
                reason: other.to_string(),
            },
        })?;
        Self::load(&manifest)
    }

    /// Look up a model, falling back to the default when `id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::UnknownModel`] if no model has the given id.
    pub fn get(&self, id: Option<&str>) -> Result<&Model, ClassifierError> {
        let id = id.unwrap_or(&self.default_id);
        self.models
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| ClassifierError::UnknownModel(id.to_string()))
    }

    #[must_use]
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model> + '_ {
        self.models.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

//! Single-text inference path.

use std::time::Instant;

use crate::error::ClassifierError;
use crate::model::{Model, ModelRegistry};
use crate::types::Prediction;

/// Classify one piece of text with the selected model (or the default one).
///
/// 1. Feed `[text]` to the model's vectorizer, giving a one-row matrix.
/// 2. Feed that matrix to the model's classifier.
/// 3. Take the first (only) predicted label.
///
/// `text` may be empty or any UTF-8; it is not trimmed, sanitized or length
/// checked. The registry is only read.
///
/// # Errors
///
/// - [`ClassifierError::UnknownModel`] if `model_id` names no loaded model.
/// - [`ClassifierError::FeatureWidthMismatch`] if the classifier rejects the matrix width.
/// - [`ClassifierError::Inference`] if prediction fails or yields no label.
pub fn classify(
    registry: &ModelRegistry,
    text: &str,
    model_id: Option<&str>,
) -> Result<Prediction, ClassifierError> {
    let model = registry.get(model_id)?;
    classify_with(model, text)
}

/// Run the inference path against a specific model.
///
/// # Errors
///
/// See [`classify`].
pub fn classify_with(model: &Model, text: &str) -> Result<Prediction, ClassifierError> {
    let started = Instant::now();

    let features = model.vectorizer().transform(&[text]);
    let labels = model.classifier().predict(&features)?;
    let label = labels.first().copied().ok_or_else(|| {
        ClassifierError::Inference("classifier returned no label for a one-row batch".to_string())
    })?;

    tracing::debug!(
        model = model.id(),
        label = label.value(),
        chars = text.chars().count(),
        elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        "text classified"
    );

    Ok(Prediction {
        model_id: model.id().to_string(),
        label,
    })
}

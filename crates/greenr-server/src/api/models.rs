use axum::{extract::State, Extension, Json};
use greenr_classifier::ClassifierKind;
use greenr_core::SentimentLabel;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ModelItem {
    id: String,
    name: String,
    description: Option<String>,
    kind: ClassifierKind,
    feature_width: usize,
    ngram_range: (usize, usize),
    tfidf: bool,
    classes: Vec<SentimentLabel>,
    vectorizer_sha256: Option<String>,
    classifier_sha256: Option<String>,
    is_default: bool,
}

pub(super) async fn list_models(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ModelItem>>> {
    let default_id = state.registry.default_id();
    let data = state
        .registry
        .iter()
        .map(|model| ModelItem {
            id: model.id().to_string(),
            name: model.name().to_string(),
            description: model.description().map(ToOwned::to_owned),
            kind: model.kind(),
            feature_width: model.feature_width(),
            ngram_range: model.vectorizer().ngram_range(),
            tfidf: model.vectorizer().is_tfidf(),
            classes: model.classes().to_vec(),
            vectorizer_sha256: model.fingerprints().vectorizer.clone(),
            classifier_sha256: model.fingerprints().classifier.clone(),
            is_default: model.id() == default_id,
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use greenr_core::SentimentLabel;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_classifier_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct LabelItem {
    value: i8,
    name: &'static str,
    description: &'static str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ClassifyRequest {
    pub text: String,
    /// Model id; the manifest default when absent or blank.
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ClassifyItem {
    model_id: String,
    label: SentimentLabel,
    name: &'static str,
    display: String,
}

pub(super) async fn list_labels(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<LabelItem>>> {
    let data = SentimentLabel::ALL
        .into_iter()
        .map(|label| LabelItem {
            value: label.value(),
            name: label.name(),
            description: label.description(),
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn classify_text(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ClassifyItem>>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejected classify body");
        ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
    })?;
    let model = body.model.as_deref().map(str::trim).filter(|m| !m.is_empty());

    let prediction = greenr_classifier::classify(&state.registry, &body.text, model)
        .map_err(|e| map_classifier_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ClassifyItem {
            display: prediction.display(),
            name: prediction.label.name(),
            label: prediction.label,
            model_id: prediction.model_id,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

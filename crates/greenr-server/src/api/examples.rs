use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use greenr_core::SentimentLabel;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ExampleItem {
    sentiment: SentimentLabel,
    name: &'static str,
    text: String,
    tweet_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(super) struct SummaryItem {
    value: i8,
    name: &'static str,
    count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct ExamplesSummary {
    total: usize,
    labels: Vec<SummaryItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExamplesQuery {
    pub sentiment: Option<String>,
    pub limit: Option<String>,
}

pub(super) async fn list_examples(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ExamplesQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ExampleItem>>>, ApiError> {
    let Query(query) = query
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;
    let sentiment = match query.sentiment.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(
            raw.parse::<SentimentLabel>()
                .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?,
        ),
        None => None,
    };
    let limit = match query.limit.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("limit must be an integer, got '{raw}'"),
            )
        })?),
        None => None,
    };
    let limit = normalize_limit(limit, state.examples_limit_max);

    let data = state
        .reference
        .filter(sentiment)
        .take(limit)
        .map(|ex| ExampleItem {
            sentiment: ex.sentiment,
            name: ex.sentiment.name(),
            text: ex.text.clone(),
            tweet_id: ex.tweet_id,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn examples_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ExamplesSummary>> {
    let labels = state
        .reference
        .counts()
        .into_iter()
        .map(|c| SummaryItem {
            value: c.label.value(),
            name: c.label.name(),
            count: c.count,
        })
        .collect();

    Json(ApiResponse {
        data: ExamplesSummary {
            total: state.reference.len(),
            labels,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

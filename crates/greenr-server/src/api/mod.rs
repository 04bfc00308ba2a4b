mod classify;
mod examples;
mod models;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use greenr_classifier::{ClassifierError, ModelRegistry};
use greenr_core::ReferenceTable;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};
use crate::pages::{self, Pages};

pub(crate) const DEFAULT_LIMIT: usize = 50;

/// Everything loaded at startup, shared read-only by every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub reference: Arc<ReferenceTable>,
    pub pages: Arc<Pages>,
    pub examples_limit_max: usize,
}

impl AppState {
    /// # Errors
    ///
    /// Returns a template error if any page template fails to compile.
    pub fn new(
        registry: ModelRegistry,
        reference: ReferenceTable,
        examples_limit_max: usize,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            registry: Arc::new(registry),
            reference: Arc::new(reference),
            pages: Arc::new(Pages::new()?),
            examples_limit_max: examples_limit_max.max(1),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    models: usize,
    default_model: String,
    reference_rows: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" | "unknown_model" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "feature_width_mismatch" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Default to [`DEFAULT_LIMIT`] rows and keep the result within `1..=max`.
pub(crate) fn normalize_limit(limit: Option<i64>, max: usize) -> usize {
    let requested = match limit {
        None => DEFAULT_LIMIT,
        Some(n) => usize::try_from(n.max(1)).unwrap_or(max),
    };
    requested.clamp(1, max.max(1))
}

/// Translate a per-request inference failure into an API error, logging it.
pub(super) fn map_classifier_error(request_id: String, error: &ClassifierError) -> ApiError {
    match error {
        ClassifierError::UnknownModel(id) => {
            tracing::warn!(model = %id, "classify requested an unknown model");
            ApiError::new(request_id, "unknown_model", error.to_string())
        }
        ClassifierError::FeatureWidthMismatch { .. } => {
            tracing::error!(error = %error, "feature width mismatch during inference");
            ApiError::new(request_id, "feature_width_mismatch", error.to_string())
        }
        ClassifierError::Inference(_) => {
            tracing::error!(error = %error, "inference failed");
            ApiError::new(request_id, "inference_error", error.to_string())
        }
        _ => {
            tracing::error!(error = %error, "unexpected classifier error");
            ApiError::new(request_id, "internal_error", "classification failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/labels", get(classify::list_labels))
        .route("/api/v1/models", get(models::list_models))
        .route("/api/v1/classify", post(classify::classify_text))
        .route("/api/v1/examples", get(examples::list_examples))
        .route("/api/v1/examples/summary", get(examples::examples_summary))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(pages::router())
        .merge(api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            models: state.registry.len(),
            default_model: state.registry.default_id().to_string(),
            reference_rows: state.reference.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use std::path::{Path, PathBuf};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use greenr_classifier::ModelRegistry;
use greenr_core::ReferenceTable;
use tower::ServiceExt;

use crate::api::{build_app, AppState};

fn resources() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../resources")
}

/// State built from the artifacts and reference table shipped in `resources/`.
pub(crate) fn app_state(examples_limit_max: usize) -> AppState {
    let registry = ModelRegistry::load_from_manifest(&resources().join("models.yaml"))
        .expect("shipped models load");
    let reference = ReferenceTable::load(&resources().join("train.csv")).expect("dataset");
    AppState::new(registry, reference, examples_limit_max).expect("templates compile")
}

pub(crate) fn app() -> Router {
    build_app(app_state(500))
}

pub(crate) async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, String::from_utf8(body.to_vec()).expect("utf-8 body"))
}

pub(crate) async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).expect("request"),
    )
    .await
}

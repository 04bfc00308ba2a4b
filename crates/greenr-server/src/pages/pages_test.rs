use axum::{
    body::Body,
    http::{Request, StatusCode},
};

use crate::test_support::{app, get, send};

async fn post_prediction(form: &str) -> (StatusCode, String) {
    send(
        app(),
        Request::builder()
            .method("POST")
            .uri("/predictions")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("request"),
    )
    .await
}

#[test]
fn every_template_compiles() {
    assert!(super::Pages::new().is_ok());
}

#[tokio::test]
async fn every_page_renders_with_navigation() {
    for uri in ["/", "/raw-data", "/predictions", "/about", "/contact"] {
        let (status, body) = get(app(), uri).await;
        assert_eq!(status, StatusCode::OK, "uri {uri}");
        for entry in ["Home", "Raw Data", "Predictions", "About Us", "Contact Us"] {
            assert!(body.contains(entry), "{uri} is missing nav entry {entry}");
        }
    }
}

#[tokio::test]
async fn raw_data_filters_by_sentiment() {
    let (status, body) = get(app(), "/raw-data?sentiment=-1&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Showing 2 of"));
    assert!(body.contains("liberal idiocy"));
    assert!(!body.contains("Portland Tribune"));
}

#[tokio::test]
async fn raw_data_reports_bad_sentiment_and_shows_all_rows() {
    let (status, body) = get(app(), "/raw-data?sentiment=sceptic&limit=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("unknown sentiment label"));
    assert!(body.contains("Showing 30 of 30"));
}

#[tokio::test]
async fn predictions_page_lists_model_tabs_and_samples() {
    let (status, body) = get(app(), "/predictions?model=logreg").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Support Vector Classifier"));
    assert!(body.contains("Logistic Regression Classifier"));
    assert!(body.contains(r#"name="model" value="logreg""#));
    assert!(body.contains("Expected output = 2"));
}

#[tokio::test]
async fn predictions_unknown_tab_falls_back_with_banner() {
    let (status, body) = get(app(), "/predictions?model=forest").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("unknown model: forest"));
    assert!(body.contains(r#"name="model" value="svc""#));
}

#[tokio::test]
async fn posting_a_tweet_shows_the_sentiment() {
    let (status, body) = post_prediction(
        "model=svc&text=Polar+bears+for+global+warming.+Fish+for+water+pollution.",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Sentiment: 0 (Neutral)"), "body: {body}");
    assert!(body.contains("Polar bears for global warming."));
}

#[tokio::test]
async fn posting_to_the_second_model_keeps_its_tab() {
    let (status, body) = post_prediction(
        "model=logreg&text=RT+Leading+the+charge+in+the+climate+change+fight+-+Portland+Tribune",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Sentiment: 1 (Pro)"));
    assert!(body.contains(r#"name="model" value="logreg""#));
}

#[tokio::test]
async fn posting_with_unknown_model_renders_an_error() {
    let (status, body) = post_prediction("model=forest&text=hello").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("unknown model: forest"));
    assert!(!body.contains("Sentiment: "));
}

#[tokio::test]
async fn submitted_text_is_escaped() {
    let (status, body) = post_prediction("text=%3Cscript%3Ealert(1)%3C%2Fscript%3E").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn about_lists_loaded_models() {
    let (_, body) = get(app(), "/about").await;
    assert!(body.contains("Support Vector Classifier"));
    assert!(body.contains("(default)"));
}

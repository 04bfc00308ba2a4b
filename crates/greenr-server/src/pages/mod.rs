//! Server-rendered pages: Home, Raw Data, Predictions, About Us, Contact Us.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use greenr_classifier::ClassifierError;
use greenr_core::SentimentLabel;
use minijinja::{context, Environment, UndefinedBehavior};
use serde::{Deserialize, Serialize};

use crate::api::{normalize_limit, AppState};

const TEMPLATES: [(&str, &str); 6] = [
    ("base.html", include_str!("templates/base.html")),
    ("home.html", include_str!("templates/home.html")),
    ("raw_data.html", include_str!("templates/raw_data.html")),
    ("predictions.html", include_str!("templates/predictions.html")),
    ("about.html", include_str!("templates/about.html")),
    ("contact.html", include_str!("templates/contact.html")),
];

/// Tweets offered on the Predictions page for checking a model by hand.
const SAMPLE_TWEETS: [(&str, SentimentLabel); 4] = [
    (
        "The biggest threat to mankind is NOT global warming but liberal idiocy\u{1F44A}\u{1F3FB}\u{1F595}\u{1F3FB}",
        SentimentLabel::Anti,
    ),
    (
        "Polar bears for global warming. Fish for water pollution.",
        SentimentLabel::Neutral,
    ),
    (
        "RT Leading the charge in the climate change fight - Portland Tribune  https://t.co/DZPzRkcVi2",
        SentimentLabel::Pro,
    ),
    (
        "G20 to focus on climate change despite Trump\u{2019}s resistance",
        SentimentLabel::News,
    ),
];

/// Compiled page templates. `.html` names get HTML auto-escaping.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    /// # Errors
    ///
    /// Returns the first template that fails to parse.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<Html<String>, PageError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

/// A template failed to render; logged and shown as a bare 500 page.
#[derive(Debug)]
pub(crate) struct PageError(minijinja::Error);

impl From<minijinja::Error> for PageError {
    fn from(err: minijinja::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "page render failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Something went wrong</h1>".to_string()),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
struct LabelView {
    value: i8,
    name: &'static str,
    description: &'static str,
}

impl From<SentimentLabel> for LabelView {
    fn from(label: SentimentLabel) -> Self {
        Self {
            value: label.value(),
            name: label.name(),
            description: label.description(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ModelTab {
    id: String,
    name: String,
    description: Option<String>,
    active: bool,
}

#[derive(Debug, Serialize)]
struct SampleTweet {
    text: &'static str,
    expected: i8,
}

#[derive(Debug, Serialize)]
struct RowView {
    value: i8,
    name: &'static str,
    text: String,
    tweet_id: Option<u64>,
}

fn labels() -> Vec<LabelView> {
    SentimentLabel::ALL.into_iter().map(LabelView::from).collect()
}

fn model_tabs(state: &AppState, active: &str) -> Vec<ModelTab> {
    state
        .registry
        .iter()
        .map(|m| ModelTab {
            id: m.id().to_string(),
            name: m.name().to_string(),
            description: m.description().map(ToOwned::to_owned),
            active: m.id() == active,
        })
        .collect()
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/raw-data", get(raw_data))
        .route("/predictions", get(predictions).post(predict))
        .route("/about", get(about))
        .route("/contact", get(contact))
}

async fn home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    state.pages.render("home.html", context! { page => "home" })
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDataQuery {
    sentiment: Option<String>,
    limit: Option<String>,
}

async fn raw_data(
    State(state): State<AppState>,
    Query(query): Query<RawDataQuery>,
) -> Result<Html<String>, PageError> {
    let mut error = None;
    let selected = match query.sentiment.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => match raw.parse::<SentimentLabel>() {
            Ok(label) => Some(label),
            Err(e) => {
                error = Some(e.to_string());
                None
            }
        },
        None => None,
    };
    let limit = normalize_limit(
        query.limit.as_deref().and_then(|l| l.trim().parse().ok()),
        state.examples_limit_max,
    );

    let counts: Vec<_> = state
        .reference
        .counts()
        .into_iter()
        .map(|c| context! { value => c.label.value(), name => c.label.name(), count => c.count })
        .collect();
    let matching = state.reference.filter(selected).count();
    let rows: Vec<RowView> = state
        .reference
        .filter(selected)
        .take(limit)
        .map(|ex| RowView {
            value: ex.sentiment.value(),
            name: ex.sentiment.name(),
            text: ex.text.clone(),
            tweet_id: ex.tweet_id,
        })
        .collect();

    state.pages.render(
        "raw_data.html",
        context! {
            page => "raw-data",
            labels => labels(),
            counts => counts,
            total => state.reference.len(),
            selected => selected.map(SentimentLabel::value),
            limit => limit,
            matching => matching,
            rows => rows,
            error => error,
        },
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictionsQuery {
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictForm {
    #[serde(default)]
    text: String,
    #[serde(default)]
    model: Option<String>,
}

/// What the Predictions page shows below the text area.
#[derive(Debug, Default)]
struct PredictionOutcome {
    text: String,
    result: Option<String>,
    error: Option<String>,
}

fn render_predictions(
    state: &AppState,
    requested: Option<&str>,
    outcome: PredictionOutcome,
) -> Result<Html<String>, PageError> {
    let mut error = outcome.error;
    let active = match state.registry.get(requested) {
        Ok(model) => model.id().to_string(),
        Err(e) => {
            error.get_or_insert_with(|| e.to_string());
            state.registry.default_id().to_string()
        }
    };

    let samples: Vec<SampleTweet> = SAMPLE_TWEETS
        .iter()
        .map(|&(text, label)| SampleTweet {
            text,
            expected: label.value(),
        })
        .collect();

    state.pages.render(
        "predictions.html",
        context! {
            page => "predictions",
            models => model_tabs(state, &active),
            active => active,
            samples => samples,
            labels => labels(),
            text => outcome.text,
            result => outcome.result,
            error => error,
        },
    )
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

async fn predictions(
    State(state): State<AppState>,
    Query(query): Query<PredictionsQuery>,
) -> Result<Html<String>, PageError> {
    render_predictions(
        &state,
        blank_to_none(query.model.as_deref()),
        PredictionOutcome::default(),
    )
}

async fn predict(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> Result<Html<String>, PageError> {
    let model = blank_to_none(form.model.as_deref());
    let outcome = match greenr_classifier::classify(&state.registry, &form.text, model) {
        Ok(prediction) => PredictionOutcome {
            result: Some(prediction.display()),
            ..PredictionOutcome::default()
        },
        Err(e) => {
            log_prediction_error(&e);
            PredictionOutcome {
                error: Some(e.to_string()),
                ..PredictionOutcome::default()
            }
        }
    };

    render_predictions(
        &state,
        model,
        PredictionOutcome {
            text: form.text,
            ..outcome
        },
    )
}

fn log_prediction_error(error: &ClassifierError) {
    if matches!(error, ClassifierError::UnknownModel(_)) {
        tracing::warn!(error = %error, "prediction requested an unknown model");
    } else {
        tracing::error!(error = %error, "prediction failed");
    }
}

async fn about(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let default_id = state.registry.default_id().to_string();
    state.pages.render(
        "about.html",
        context! {
            page => "about",
            models => model_tabs(&state, &default_id),
        },
    )
}

async fn contact(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    state.pages.render("contact.html", context! { page => "contact" })
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;

//! Command handlers. Each returns the text to print so it can be checked in tests.

use std::fmt::Write as _;

use greenr_classifier::{classify, ModelRegistry};
use greenr_core::{ReferenceTable, SentimentLabel};
use serde::Serialize;

pub(crate) const DEFAULT_EXAMPLES_LIMIT: usize = 20;

/// Longest message prefix shown in the examples table.
const MESSAGE_WIDTH: usize = 90;

#[derive(Debug, Serialize)]
struct ClassifyOutput<'a> {
    model_id: &'a str,
    label: SentimentLabel,
    name: &'static str,
    display: String,
}

/// Classify `text` and render either the display line or a JSON object.
///
/// # Errors
///
/// Returns an error for an unknown model or a failed inference.
pub(crate) fn run_classify(
    registry: &ModelRegistry,
    text: &str,
    model: Option<&str>,
    json: bool,
) -> anyhow::Result<String> {
    let prediction = classify(registry, text, model)?;

    if json {
        let out = ClassifyOutput {
            model_id: &prediction.model_id,
            label: prediction.label,
            name: prediction.label.name(),
            display: prediction.display(),
        };
        return Ok(format!("{}\n", serde_json::to_string(&out)?));
    }

    Ok(format!("{}\n", prediction.display()))
}

pub(crate) fn format_models(registry: &ModelRegistry) -> String {
    let mut out = format!(
        "{:<10}{:<22}{:<10}{:<14}{}\n",
        "ID", "KIND", "FEATURES", "VECTORIZER", "NAME"
    );
    for model in registry.iter() {
        let marker = if model.id() == registry.default_id() {
            " (default)"
        } else {
            ""
        };
        let digest = model
            .fingerprints()
            .vectorizer
            .as_deref()
            .map_or("-", |d| &d[..d.len().min(12)]);
        let _ = writeln!(
            out,
            "{:<10}{:<22}{:<10}{:<14}{}{marker}",
            model.id(),
            model.kind().to_string(),
            model.feature_width(),
            digest,
            model.name()
        );
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

pub(crate) fn format_examples(
    reference: &ReferenceTable,
    sentiment: Option<SentimentLabel>,
    limit: usize,
) -> String {
    let matching = reference.filter(sentiment).count();
    if matching == 0 {
        return "no reference tweets match\n".to_string();
    }

    let mut out = format!("{:<12}{:<12}MESSAGE\n", "SENTIMENT", "TWEET ID");
    for example in reference.filter(sentiment).take(limit) {
        let label = format!("{} ({})", example.sentiment.value(), example.sentiment.name());
        let tweet_id = example
            .tweet_id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let _ = writeln!(
            out,
            "{label:<12}{tweet_id:<12}{}",
            truncate(&example.text, MESSAGE_WIDTH)
        );
    }
    let _ = writeln!(out, "showing {} of {matching}", matching.min(limit));
    out
}

pub(crate) fn format_summary(reference: &ReferenceTable) -> String {
    let mut out = format!("{:<8}{:<10}{}\n", "VALUE", "LABEL", "TWEETS");
    for count in reference.counts() {
        let _ = writeln!(
            out,
            "{:<8}{:<10}{}",
            count.label.value(),
            count.label.name(),
            count.count
        );
    }
    let _ = writeln!(out, "{:<8}{:<10}{}", "", "total", reference.len());
    out
}

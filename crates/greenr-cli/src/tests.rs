use std::path::{Path, PathBuf};

use super::*;

fn resources() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../resources")
}

fn registry() -> ModelRegistry {
    ModelRegistry::load_from_manifest(&resources().join("models.yaml")).expect("models")
}

fn reference() -> ReferenceTable {
    ReferenceTable::load(&resources().join("train.csv")).expect("dataset")
}

#[test]
fn parses_classify_with_model_and_json() {
    let cli = Cli::try_parse_from([
        "greenr-cli",
        "classify",
        "--model",
        "logreg",
        "--json",
        "Polar",
        "bears",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Classify { model: Some(ref m), json: true, ref text }
            if m == "logreg" && text == &["Polar", "bears"]
    ));
}

#[test]
fn classify_requires_text() {
    assert!(Cli::try_parse_from(["greenr-cli", "classify"]).is_err());
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["greenr-cli"]).is_err());
}

#[test]
fn parses_examples_with_negative_sentiment() {
    let cli = Cli::try_parse_from(["greenr-cli", "examples", "--sentiment", "-1", "--limit", "5"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Examples {
            sentiment: Some(SentimentLabel::Anti),
            limit: Some(5)
        }
    ));
}

#[test]
fn parses_examples_sentiment_by_name() {
    let cli = Cli::try_parse_from(["greenr-cli", "examples", "--sentiment", "News"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Examples {
            sentiment: Some(SentimentLabel::News),
            limit: None
        }
    ));
}

#[test]
fn rejects_unknown_sentiment() {
    assert!(Cli::try_parse_from(["greenr-cli", "examples", "--sentiment", "7"]).is_err());
}

#[test]
fn global_paths_are_accepted_after_subcommand() {
    let cli = Cli::try_parse_from(["greenr-cli", "summary", "--models", "/tmp/models.yaml"])
        .expect("expected valid cli args");
    assert_eq!(cli.models.as_deref(), Some(Path::new("/tmp/models.yaml")));
    assert!(matches!(cli.command, Commands::Summary));
}

#[test]
fn classify_prints_display_line() {
    let out = commands::run_classify(
        &registry(),
        "G20 to focus on climate change despite Trump's resistance",
        None,
        false,
    )
    .expect("classify");
    assert_eq!(out, "Sentiment: 2 (News)\n");
}

#[test]
fn classify_json_output() {
    let out = commands::run_classify(
        &registry(),
        "Polar bears for global warming. Fish for water pollution.",
        Some("logreg"),
        true,
    )
    .expect("classify");
    let value: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(value["model_id"], "logreg");
    assert_eq!(value["label"], 0);
    assert_eq!(value["name"], "Neutral");
}

#[test]
fn classify_unknown_model_is_an_error() {
    let err = commands::run_classify(&registry(), "hello", Some("forest"), false).unwrap_err();
    assert!(err.to_string().contains("unknown model"));
}

#[test]
fn models_lists_each_model_and_default() {
    let out = commands::format_models(&registry());
    assert!(out.starts_with("ID"));
    assert!(out.contains("svc"));
    assert!(out.contains("logistic_regression"));
    assert!(out.contains("(default)"));
    assert_eq!(out.lines().count(), 3);
}

#[test]
fn examples_respect_filter_and_limit() {
    let out = commands::format_examples(&reference(), Some(SentimentLabel::Pro), 2);
    let rows: Vec<&str> = out.lines().skip(1).filter(|l| l.starts_with("1 (Pro)")).collect();
    assert_eq!(rows.len(), 2);
    assert!(out.ends_with("showing 2 of 10\n"));
}

#[test]
fn summary_totals_every_label() {
    let out = commands::format_summary(&reference());
    for name in ["Anti", "Neutral", "Pro", "News"] {
        assert!(out.contains(name), "missing {name}");
    }
    assert!(out.trim_end().ends_with("30"));
}

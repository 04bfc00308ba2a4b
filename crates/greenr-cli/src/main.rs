mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use greenr_classifier::ModelRegistry;
use greenr_core::{ReferenceTable, SentimentLabel};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "greenr-cli")]
#[command(about = "Classify climate-change tweets and browse the reference data")]
struct Cli {
    /// Models manifest to load instead of `GREENR_MODELS_PATH`
    #[arg(long, global = true)]
    models: Option<PathBuf>,

    /// Reference CSV to load instead of `GREENR_DATASET_PATH`
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify a tweet; all TEXT arguments are joined with spaces
    Classify {
        /// Model id from the manifest (defaults to the manifest default)
        #[arg(long)]
        model: Option<String>,

        /// Print the prediction as JSON
        #[arg(long)]
        json: bool,

        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Load every model in the manifest and list it
    Models,
    /// List reference tweets
    Examples {
        /// Only show one label, by value (-1, 0, 1, 2) or name (anti, neutral, pro, news)
        #[arg(long, allow_hyphen_values = true)]
        sentiment: Option<SentimentLabel>,

        /// Maximum rows to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Per-label counts of the reference table
    Summary,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = greenr_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let models_path = cli.models.unwrap_or(config.models_path);
    let dataset_path = cli.dataset.unwrap_or(config.dataset_path);

    let load_registry = || {
        ModelRegistry::load_from_manifest(&models_path)
            .with_context(|| format!("failed to load models from {}", models_path.display()))
    };
    let load_reference = || {
        ReferenceTable::load(&dataset_path)
            .with_context(|| format!("failed to load reference data from {}", dataset_path.display()))
    };

    tracing::debug!(command = ?cli.command, "running command");
    let output = match cli.command {
        Commands::Classify { model, json, text } => {
            commands::run_classify(&load_registry()?, &text.join(" "), model.as_deref(), json)?
        }
        Commands::Models => commands::format_models(&load_registry()?),
        Commands::Examples { sentiment, limit } => {
            let limit = limit
                .unwrap_or(commands::DEFAULT_EXAMPLES_LIMIT)
                .clamp(1, config.examples_limit_max);
            commands::format_examples(&load_reference()?, sentiment, limit)
        }
        Commands::Summary => commands::format_summary(&load_reference()?),
    };

    print!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests;

//! Migration Advisor CLI
//!
//! Analyzes application inventory exports into cloud migration
//! recommendations and answers follow-up questions about them.

mod commands;
mod config;
mod output;

use advisor_lib::{narrative::build_narrator, Analyzer, EngineConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Migration Advisor CLI
#[derive(Parser)]
#[command(name = "advisor")]
#[command(author, version, about = "Cloud migration advisor for application inventories", long_about = None)]
pub struct Cli {
    /// JSON engine configuration overriding the built-in tables
    #[arg(long, env = "ADVISOR_ENGINE_CONFIG", global = true)]
    pub engine_config: Option<PathBuf>,

    /// Chat-completions endpoint used by `ask`
    #[arg(long, env = "ADVISOR_NARRATOR_ENDPOINT", global = true)]
    pub narrator_endpoint: Option<String>,

    /// Model name sent to the chat-completions endpoint
    #[arg(long, env = "ADVISOR_NARRATOR_MODEL", global = true)]
    pub narrator_model: Option<String>,

    /// API key for the chat-completions endpoint
    #[arg(long, env = "ADVISOR_NARRATOR_API_KEY", hide_env_values = true, global = true)]
    pub narrator_api_key: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze an inventory export
    Analyze {
        /// Inventory JSON file
        file: PathBuf,

        /// Save the recommendation as MigrationAnalysis_<Name>_<timestamp>.json
        #[arg(long)]
        save: bool,

        /// Directory for saved analyses
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Ask a follow-up question about a saved analysis
    Ask {
        /// Saved analysis JSON file
        analysis: PathBuf,

        /// Question to answer
        question: String,
    },

    /// Show the compute tier table
    Tiers,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::Config::load()?.apply(config::Overrides {
        engine_config: cli.engine_config,
        narrator_endpoint: cli.narrator_endpoint,
        narrator_model: cli.narrator_model,
        narrator_api_key: cli.narrator_api_key,
    });

    let engine = match &config.engine_config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let analyzer = Analyzer::new(engine).context("Engine configuration rejected")?;

    match cli.command {
        Commands::Analyze {
            file,
            save,
            output_dir,
        } => {
            let output_dir = output_dir.or(config.output_dir);
            commands::analyze::run(&analyzer, &file, save, output_dir.as_deref(), cli.format)?;
        }
        Commands::Ask { analysis, question } => {
            let narrator = build_narrator(config.narrator.as_ref())
                .context("Failed to configure narrative generator")?;
            commands::ask::run(narrator.as_ref(), &analysis, &question, cli.format).await?;
        }
        Commands::Tiers => {
            commands::tiers::run(&analyzer, cli.format)?;
        }
    }

    Ok(())
}

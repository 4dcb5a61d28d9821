//! BMRB Ingest - chemical shift and secondary structure collection tool

use anyhow::{Context, Result};
use bmrb_common::logging::{init_logging, LogConfig, LogLevel};
use bmrb_ingest::config::{BmrbHttpConfig, DEFAULT_SEARCH_URL};
use bmrb_ingest::crossref::RowPolicy;
use bmrb_ingest::selection::SelectionStrategy;
use bmrb_ingest::{BmrbClient, Pipeline, PipelineOptions};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bmrb-ingest")]
#[command(author, version, about = "Collect BMRB carbon shifts annotated with PDB secondary structure")]
struct Cli {
    /// BMRB search-results page listing entries
    #[arg(long, env = "BMRB_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    search_url: String,

    /// Number of entries to process
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// Output directory for CSV tables
    #[arg(short, long, env = "BMRB_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// HTTP timeout in seconds (overrides BMRB_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// How to choose among an entry's PDB structures
    #[arg(long, value_enum, default_value_t = Selection::First)]
    selection: Selection,

    /// Seed for --selection random
    #[arg(long)]
    seed: Option<u64>,

    /// Which summary-page rows contribute PDB codes
    #[arg(long, value_enum, default_value_t = RowPolicy::AllRows)]
    row_policy: RowPolicy,

    /// Write the run report as JSON to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Selection {
    First,
    Random,
}

impl Cli {
    fn selection_strategy(&self) -> SelectionStrategy {
        match self.selection {
            Selection::First => SelectionStrategy::First,
            Selection::Random => SelectionStrategy::Random { seed: self.seed },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("bmrb-ingest")
        .build()
        .with_env_overrides()?;

    let _log_guard = init_logging(&log_config)?;

    let mut http_config = BmrbHttpConfig::from_env()?;
    if let Some(secs) = cli.timeout_secs {
        http_config.timeout_secs = secs;
    }

    let client = BmrbClient::new(http_config)?;
    let options = PipelineOptions {
        output_dir: cli.output_dir.clone(),
        selection: cli.selection_strategy(),
        row_policy: cli.row_policy,
        show_progress: !cli.no_progress,
    };

    info!(
        output_dir = %options.output_dir.display(),
        count = cli.count,
        selection = ?options.selection,
        row_policy = ?options.row_policy,
        "Starting BMRB ingestion"
    );

    let mut pipeline = Pipeline::new(client, options);
    let report = pipeline.run(&cli.search_url, cli.count).await?;

    if let Some(path) = &cli.summary {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!(path = %path.display(), "Run summary saved");
    }

    if let Some(err) = &report.discovery_error {
        anyhow::bail!("Entry discovery failed: {}", err);
    }

    info!("Ingestion complete");
    Ok(())
}

//! CDP Ingest - Catalog harvesting tool

use anyhow::Result;
use cdp_common::logging::{init_logging, LogConfig, LogLevel};
use cdp_ingest::harvest::{HarvestEvent, HarvestObserver, HarvestState, Harvester};
use cdp_ingest::source::SourceProfile;
use cdp_ingest::{merge, partition, writer};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "cdp-ingest")]
#[command(author, version, about = "CDP catalog harvesting tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Harvest one collection from a catalog source
    Harvest {
        /// Built-in source key (see --help for known keys)
        #[arg(short, long)]
        source: Option<String>,

        /// JSON source profile file, used instead of a built-in key
        #[arg(long, conflicts_with = "source")]
        profile: Option<PathBuf>,

        /// Collection handle to page through
        #[arg(short, long)]
        collection: String,

        /// Output CSV path
        #[arg(short, long, default_value = "./data/products.csv")]
        output: PathBuf,

        /// Override the profile's products-per-page
        #[arg(long)]
        page_size: Option<u32>,

        /// Override the profile's inter-page delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Override the profile's safety page cap
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Union-merge per-source datasets into one file
    Merge {
        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Input CSV files, merged in order; missing files are skipped
        #[arg(required = false)]
        inputs: Vec<PathBuf>,
    },

    /// Split a dataset into fixed-size chunk files
    Split {
        /// Rows per chunk
        #[arg(long, default_value_t = 5000)]
        chunk_size: usize,

        /// Input CSV path
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment variables take precedence over the verbose flag
    let mut log_config = LogConfig::from_env()?;
    if cli.verbose && std::env::var("LOG_LEVEL").is_err() {
        log_config.level = LogLevel::Debug;
    }
    log_config.log_file_prefix = "cdp-ingest".to_string();

    init_logging(&log_config)?;

    match cli.command {
        Command::Harvest {
            source,
            profile,
            collection,
            output,
            page_size,
            delay_ms,
            max_pages,
        } => {
            let mut profile = resolve_profile(source.as_deref(), profile.as_deref())?;
            if let Some(page_size) = page_size {
                profile.page_size = page_size;
            }
            if let Some(delay_ms) = delay_ms {
                profile.delay_ms = delay_ms;
            }
            if let Some(max_pages) = max_pages {
                profile.max_pages = max_pages;
            }

            let harvester = Harvester::new(profile)?;
            let mut observer = ProgressObserver::new();
            let report = harvester.harvest(&collection, &mut observer).await;

            if report.state == HarvestState::Failed {
                warn!("harvest ended early on a fetch failure; writing partial output");
            }
            writer::write_dataset(&output, &report.records)?;
            info!(
                records = report.records.len(),
                pages = report.pages,
                skipped = report.skipped,
                output = %output.display(),
                "harvest written"
            );
        },
        Command::Merge { output, inputs } => {
            let summary = merge::merge(&inputs, &output)?;
            if summary.merged.is_empty() {
                info!("no datasets to merge");
            } else {
                info!(
                    records = summary.records,
                    columns = summary.columns.len(),
                    skipped = summary.skipped.len(),
                    "merged into {}",
                    output.display()
                );
            }
        },
        Command::Split { chunk_size, input } => {
            let chunks = partition::partition(&input, chunk_size)?;
            info!(chunks = chunks.len(), "split {}", input.display());
        },
    }

    Ok(())
}

fn resolve_profile(
    source: Option<&str>,
    profile: Option<&std::path::Path>,
) -> Result<SourceProfile> {
    match (source, profile) {
        (_, Some(path)) => Ok(SourceProfile::from_file(path)?),
        (Some(key), None) => Ok(SourceProfile::builtin(key)?),
        (None, None) => anyhow::bail!(
            "either --source or --profile is required; built-in sources: {}",
            SourceProfile::builtin_keys().join(", ")
        ),
    }
}

/// Spinner-backed observer for interactive runs.
struct ProgressObserver {
    bar: ProgressBar,
    records: usize,
}

impl ProgressObserver {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            bar.set_style(style);
        }
        Self { bar, records: 0 }
    }
}

impl HarvestObserver for ProgressObserver {
    fn on_event(&mut self, event: &HarvestEvent) {
        match event {
            HarvestEvent::PageFetched { page, products } => {
                self.records += products;
                self.bar
                    .set_message(format!("page {page}: {products} products ({} total)", self.records));
            },
            HarvestEvent::PageFailed { page, error } => {
                self.bar.set_message(format!("page {page} failed: {error}"));
            },
            HarvestEvent::RecordSkipped { product_id, reason } => {
                self.bar
                    .set_message(format!("skipped product {product_id}: {reason}"));
            },
            HarvestEvent::Finished { pages, records, .. } => {
                self.bar
                    .finish_with_message(format!("{records} products from {pages} pages"));
            },
        }
    }
}

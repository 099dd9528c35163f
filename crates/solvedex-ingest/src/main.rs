//! solvedex-ingest - harvest solved.ac problem metadata

use anyhow::Result;
use clap::Parser;
use solvedex_common::logging::{init_logging, LogConfig, LogLevel};
use solvedex_ingest::config::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY, DEFAULT_FIRST_ID, DEFAULT_LAST_ID,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use solvedex_ingest::{pipeline, ExportConfig, HarvestConfig, LookupConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "solvedex-ingest")]
#[command(author, version, about = "Harvest problem metadata from solved.ac")]
struct Cli {
    /// First problem id (inclusive)
    #[arg(long, default_value_t = DEFAULT_FIRST_ID)]
    first_id: u32,

    /// Last problem id (inclusive)
    #[arg(long, default_value_t = DEFAULT_LAST_ID)]
    last_id: u32,

    /// Directory for problems.json, problems.csv and filtered_problems.csv
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// solved.ac API root
    #[arg(long, env = "SOLVEDEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Problem ids per lookup request
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Lookup requests in flight
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(long, env = "SOLVEDEX_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Skip filtered_problems.csv
    #[arg(long)]
    no_projection: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn harvest_config(&self) -> HarvestConfig {
        HarvestConfig {
            first_id: self.first_id,
            last_id: self.last_id,
            lookup: LookupConfig {
                base_url: self.base_url.clone(),
                batch_size: self.batch_size,
                concurrency: self.concurrency,
                request_timeout_secs: (self.timeout_secs > 0).then_some(self.timeout_secs),
            },
            export: ExportConfig {
                output_dir: self.output_dir.clone(),
                write_projection: !self.no_projection,
                ..Default::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over the flags
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("solvedex-ingest")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    let summary = pipeline::run(&cli.harvest_config()).await?;

    info!(
        "Done: {} / {} batches succeeded, {} records, projection {}",
        summary.batches - summary.failed_batches,
        summary.batches,
        summary.records,
        if summary.projection_written {
            "written"
        } else {
            "skipped"
        }
    );
    Ok(())
}

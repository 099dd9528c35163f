//! One harvest run: look up every configured problem, then export

use solvedex_common::Result;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::HarvestConfig;
use crate::export::{ExportOutcome, Exporter};
use crate::fetcher::{BatchFailure, BatchFetcher};

/// What a run fetched and wrote
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub requested_ids: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub records: usize,
    pub projection_written: bool,
    pub files: Vec<PathBuf>,
    pub duration_seconds: f64,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct HarvestOutput {
    pub summary: RunSummary,
    pub export: ExportOutcome,
    pub failures: Vec<BatchFailure>,
}

/// Run a full harvest with `config`
pub async fn run(config: &HarvestConfig) -> Result<RunSummary> {
    Ok(run_detailed(config).await?.summary)
}

/// Like [`run`], also returning the export tables and the failed batches
pub async fn run_detailed(config: &HarvestConfig) -> Result<HarvestOutput> {
    config.validate()?;
    let start_time = Instant::now();

    let ids = config.identifiers();
    info!(
        "Harvesting problems {}..={} from {}",
        config.first_id, config.last_id, config.lookup.base_url
    );

    let fetcher = BatchFetcher::from_config(&config.lookup)?;
    let report = fetcher.fetch_report(&ids).await;

    if report.failed() > 0 {
        warn!(
            "{} of {} batches failed; their problems are missing from the export",
            report.failed(),
            report.batches
        );
    }

    let outcome = Exporter::new(config.export.clone()).export(&report.records)?;

    let summary = RunSummary {
        requested_ids: ids.len(),
        batches: report.batches,
        failed_batches: report.failed(),
        records: report.records.len(),
        projection_written: outcome.projection.is_some(),
        files: outcome.written.clone(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    info!(
        "Harvest complete: {} records for {} ids, {} files written in {:.2}s",
        summary.records,
        summary.requested_ids,
        summary.files.len(),
        summary.duration_seconds
    );

    Ok(HarvestOutput {
        summary,
        export: outcome,
        failures: report.failures,
    })
}

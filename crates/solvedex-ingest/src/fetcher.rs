//! Concurrent batched lookups
//!
//! The identifier set is split into batches and every batch becomes one
//! lookup future. At most `concurrency` futures run at a time through
//! `buffer_unordered`, and completed batches are appended to the result by the
//! single loop draining that stream, so no shared state needs locking.
//!
//! A batch that fails (non-200 status, transport error, undecodable body) is
//! logged and contributes nothing. It is not retried.

use futures::stream::{self, StreamExt};
use solvedex_common::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::batch::{partition, Batch};
use crate::client::LookupClient;
use crate::config::LookupConfig;
use crate::{ProblemId, Record};

/// Characters of the joined id list shown in progress lines
const PREVIEW_CHARS: usize = 10;

/// A batch whose records were dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    pub first_id: Option<ProblemId>,
    pub len: usize,
    pub reason: String,
}

/// Outcome of one fetch
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Records from every successful batch, in completion order
    pub records: Vec<Record>,
    /// Number of batches dispatched
    pub batches: usize,
    /// Number of batches that returned 200 with a decodable body
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

impl FetchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Fans lookups out over a bounded number of concurrent requests
#[derive(Debug, Clone)]
pub struct BatchFetcher {
    client: LookupClient,
    batch_size: usize,
    concurrency: usize,
}

impl BatchFetcher {
    pub fn new(client: LookupClient, batch_size: usize, concurrency: usize) -> Self {
        Self {
            client,
            batch_size,
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            LookupClient::new(config)?,
            config.batch_size,
            config.concurrency,
        ))
    }

    /// Fetch records for `ids`, dropping failed batches
    pub async fn fetch(&self, ids: &[ProblemId]) -> Vec<Record> {
        self.fetch_report(ids).await.records
    }

    /// Fetch records for `ids` and report which batches failed
    pub async fn fetch_report(&self, ids: &[ProblemId]) -> FetchReport {
        let batches = partition(ids, self.batch_size);
        let total = batches.len();
        let mut report = FetchReport {
            batches: total,
            ..Default::default()
        };

        if batches.is_empty() {
            info!("No problem ids to look up");
            return report;
        }

        let start_time = Instant::now();
        info!(
            "Looking up {} problems in {} batches (concurrency={})",
            ids.len(),
            total,
            self.concurrency
        );

        let mut completed = stream::iter(batches)
            .map(|batch| async move {
                info!(
                    "Requesting batch {} / {}: {}",
                    batch.index + 1,
                    total,
                    preview(&batch)
                );
                let result = self.client.lookup(batch.ids).await;
                (batch, result)
            })
            .buffer_unordered(self.concurrency);

        while let Some((batch, result)) = completed.next().await {
            match result {
                Ok(records) => {
                    info!(
                        "Batch {} / {} ({}) -> status 200, {} records",
                        batch.index + 1,
                        total,
                        preview(&batch),
                        records.len()
                    );
                    report.succeeded += 1;
                    report.records.extend(records);
                },
                Err(e) => {
                    warn!(
                        "Batch {} / {} ({}) failed, skipping {} ids: {}",
                        batch.index + 1,
                        total,
                        preview(&batch),
                        batch.len(),
                        e
                    );
                    report.failures.push(BatchFailure {
                        index: batch.index,
                        first_id: batch.first_id(),
                        len: batch.len(),
                        reason: e.to_string(),
                    });
                },
            }
        }

        info!(
            "Lookup finished: {} records from {} / {} batches in {:.2}s",
            report.records.len(),
            report.succeeded,
            total,
            start_time.elapsed().as_secs_f64()
        );

        report
    }
}

fn preview(batch: &Batch<'_>) -> String {
    let joined = batch.query_value();
    let head: String = joined.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head)
}

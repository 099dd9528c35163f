//! solvedex Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Harvests problem metadata from the solved.ac lookup API and exports it as
//! JSON and CSV.
//!
//! # Example
//!
//! ```no_run
//! use solvedex_ingest::{pipeline, HarvestConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = HarvestConfig {
//!         first_id: 1000,
//!         last_id: 1099,
//!         ..Default::default()
//!     };
//!     let summary = pipeline::run(&config).await?;
//!     println!("{} records", summary.records);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod export;
pub mod fetcher;
pub mod pipeline;
pub mod table;

/// Numeric problem identifier used by solved.ac and Baekjoon
pub type ProblemId = u32;

/// One problem's metadata, with fields in the order the API sent them
pub type Record = serde_json::Map<String, serde_json::Value>;

pub use config::{ExportConfig, HarvestConfig, LookupConfig};
pub use export::Exporter;
pub use fetcher::{BatchFetcher, FetchReport};
pub use table::Table;

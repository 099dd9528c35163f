//! Harvest configuration
//!
//! Every knob the run needs is carried here and handed to [`crate::pipeline::run`]
//! explicitly. The defaults reproduce the reference harvest: problems 1000
//! through 4999, 50 ids per request, 10 requests in flight.

use serde::{Deserialize, Serialize};
use solvedex_common::{Result, SolvedexError};
use std::path::PathBuf;
use std::time::Duration;

use crate::ProblemId;

/// Public solved.ac API root
pub const DEFAULT_BASE_URL: &str = "https://solved.ac/api/v3";

/// Maximum number of problem ids sent in one lookup request
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Maximum number of lookup requests in flight
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Per-request timeout applied by the HTTP client
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_FIRST_ID: ProblemId = 1000;
pub const DEFAULT_LAST_ID: ProblemId = 4999;

/// Lookup API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookupConfig {
    /// API root; `/problem/lookup` is appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Ids per request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Requests in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// `None` disables the timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: Option<u64>,
}

/// Output file settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_json_file")]
    pub json_file: String,
    #[serde(default = "default_csv_file")]
    pub csv_file: String,
    #[serde(default = "default_projection_file")]
    pub projection_file: String,
    /// Write the numeric projection next to the full table
    #[serde(default = "default_true")]
    pub write_projection: bool,
}

/// Complete configuration for one harvest run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HarvestConfig {
    /// First problem id, inclusive
    pub first_id: ProblemId,
    /// Last problem id, inclusive
    pub last_id: ProblemId,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_request_timeout_secs() -> Option<u64> {
    Some(DEFAULT_REQUEST_TIMEOUT_SECS)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_json_file() -> String {
    "problems.json".to_string()
}

fn default_csv_file() -> String {
    "problems.csv".to_string()
}

fn default_projection_file() -> String {
    "filtered_problems.csv".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl LookupConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(SolvedexError::config("base_url must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(SolvedexError::config("batch_size must be greater than 0"));
        }
        if self.concurrency == 0 {
            return Err(SolvedexError::config("concurrency must be greater than 0"));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(SolvedexError::config(
                "request_timeout_secs must be greater than 0 when set",
            ));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            json_file: default_json_file(),
            csv_file: default_csv_file(),
            projection_file: default_projection_file(),
            write_projection: true,
        }
    }
}

impl ExportConfig {
    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json_file)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_file)
    }

    pub fn projection_path(&self) -> PathBuf {
        self.output_dir.join(&self.projection_file)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("json_file", &self.json_file),
            ("csv_file", &self.csv_file),
            ("projection_file", &self.projection_file),
        ] {
            if value.trim().is_empty() {
                return Err(SolvedexError::config(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            first_id: DEFAULT_FIRST_ID,
            last_id: DEFAULT_LAST_ID,
            lookup: LookupConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl HarvestConfig {
    /// Problem ids to request, ascending and contiguous
    pub fn identifiers(&self) -> Vec<ProblemId> {
        (self.first_id..=self.last_id).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.first_id > self.last_id {
            return Err(SolvedexError::config(format!(
                "first_id ({}) must not exceed last_id ({})",
                self.first_id, self.last_id
            )));
        }
        self.lookup.validate()?;
        self.export.validate()
    }
}

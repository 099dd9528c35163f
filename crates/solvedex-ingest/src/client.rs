//! HTTP client for the solved.ac problem lookup endpoint

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use solvedex_common::{Result, SolvedexError};
use tracing::debug;

use crate::batch::join_ids;
use crate::config::LookupConfig;
use crate::{ProblemId, Record};

/// Path of the lookup endpoint below the API root
pub const LOOKUP_PATH: &str = "/problem/lookup";

/// Client for `GET /problem/lookup?problemIds=...`
#[derive(Debug, Clone)]
pub struct LookupClient {
    client: Client,
    lookup_url: String,
}

impl LookupClient {
    /// Create a client for the API root in `config`
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| SolvedexError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            lookup_url: lookup_url(&config.base_url),
        })
    }

    pub fn lookup_url(&self) -> &str {
        &self.lookup_url
    }

    /// Look up metadata for `ids` in a single request.
    ///
    /// Anything other than `200 OK` is reported as [`SolvedexError::HttpStatus`].
    /// A body that is not a JSON array of objects is a [`SolvedexError::Parse`].
    pub async fn lookup(&self, ids: &[ProblemId]) -> Result<Vec<Record>> {
        let problem_ids = join_ids(ids);

        let response = self
            .client
            .get(&self.lookup_url)
            .header(ACCEPT, "application/json")
            .query(&[("problemIds", problem_ids.as_str())])
            .send()
            .await
            .map_err(|e| SolvedexError::network(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), ids = ids.len(), "Lookup response received");

        if status != StatusCode::OK {
            return Err(SolvedexError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SolvedexError::network(e.to_string()))?;

        serde_json::from_str::<Vec<Record>>(&body)
            .map_err(|e| SolvedexError::parse(format!("Unexpected lookup response body: {}", e)))
    }
}

fn lookup_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), LOOKUP_PATH)
}

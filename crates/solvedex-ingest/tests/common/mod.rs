//! Shared helpers for lookup integration tests
//!
//! Tests stand up a `wiremock` server that answers `/problem/lookup` the way
//! solved.ac does and point the fetcher at it.

#![allow(dead_code)]

use serde_json::{json, Value};
use solvedex_ingest::batch::join_ids;
use solvedex_ingest::client::LOOKUP_PATH;
use solvedex_ingest::{LookupConfig, ProblemId};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// A problem object shaped like the lookup API's response items
pub fn problem(id: ProblemId) -> Value {
    json!({
        "problemId": id,
        "titleKo": format!("문제 {}", id),
        "isSolvable": true,
        "acceptedUserCount": id * 10,
        "level": id % 31,
        "votedUserCount": id % 7,
        "averageTries": 1.5,
        "tags": [{"key": "implementation", "problemCount": 5000}]
    })
}

/// Response body for a successful lookup of `ids`
pub fn lookup_body(ids: &[ProblemId]) -> Value {
    Value::Array(ids.iter().map(|&id| problem(id)).collect())
}

/// Lookup settings aimed at the mock server
pub fn lookup_config(server: &MockServer, batch_size: usize, concurrency: usize) -> LookupConfig {
    LookupConfig {
        base_url: server.uri(),
        batch_size,
        concurrency,
        request_timeout_secs: Some(10),
    }
}

/// Expect exactly one lookup for `ids` and answer it with `response`
pub async fn mount_lookup(server: &MockServer, ids: &[ProblemId], response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(LOOKUP_PATH))
        .and(header("accept", "application/json"))
        .and(query_param("problemIds", join_ids(ids)))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Expect one successful lookup per chunk of `ids`
pub async fn mount_batches(server: &MockServer, ids: &[ProblemId], batch_size: usize) {
    for chunk in ids.chunks(batch_size) {
        mount_lookup(
            server,
            chunk,
            ResponseTemplate::new(200).set_body_json(lookup_body(chunk)),
        )
        .await;
    }
}

/// `problemId` of every record, sorted
pub fn sorted_ids(records: &[solvedex_ingest::Record]) -> Vec<ProblemId> {
    let mut ids: Vec<ProblemId> = records
        .iter()
        .filter_map(|r| r.get("problemId").and_then(Value::as_u64))
        .map(|id| id as ProblemId)
        .collect();
    ids.sort_unstable();
    ids
}

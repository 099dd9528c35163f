//! Integration tests for batched lookups against a mock solved.ac
//!
//! These cover:
//! - batch count and request shape
//! - partial failure (error status, bad body, timeout)
//! - empty input and empty responses
//! - the concurrency bound

mod common;

use common::{lookup_body, lookup_config, mount_batches, mount_lookup, problem, sorted_ids};
use serde_json::json;
use solvedex_common::SolvedexError;
use solvedex_ingest::client::LookupClient;
use solvedex_ingest::{BatchFetcher, ProblemId};
use std::time::{Duration, Instant};
use wiremock::{MockServer, ResponseTemplate};

fn fetcher(server: &MockServer, batch_size: usize, concurrency: usize) -> BatchFetcher {
    BatchFetcher::from_config(&lookup_config(server, batch_size, concurrency))
        .expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_empty_ids_make_no_requests() {
    let server = MockServer::start().await;

    let report = fetcher(&server, 50, 10).fetch_report(&[]).await;

    assert!(report.records.is_empty());
    assert_eq!(report.batches, 0);
    assert!(report.failures.is_empty());
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_hundred_ids_make_two_requests() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = (1000..1100).collect();
    mount_batches(&server, &ids, 50).await;

    let report = fetcher(&server, 50, 10).fetch_report(&ids).await;

    assert_eq!(report.batches, 2);
    assert_eq!(report.succeeded, 2);
    assert!(report.failures.is_empty());
    assert_eq!(report.records.len(), 100);
    assert_eq!(sorted_ids(&report.records), ids);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_all_batches_contribute_without_duplicates() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = (1000..1237).collect();
    mount_batches(&server, &ids, 50).await;

    let records = fetcher(&server, 50, 3).fetch(&ids).await;

    assert_eq!(records.len(), ids.len());
    assert_eq!(sorted_ids(&records), ids);
}

#[tokio::test]
async fn test_server_error_drops_only_that_batch() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = (1000..1150).collect();
    mount_lookup(
        &server,
        &ids[0..50],
        ResponseTemplate::new(200).set_body_json(lookup_body(&ids[0..50])),
    )
    .await;
    mount_lookup(&server, &ids[50..100], ResponseTemplate::new(500)).await;
    mount_lookup(
        &server,
        &ids[100..150],
        ResponseTemplate::new(200).set_body_json(lookup_body(&ids[100..150])),
    )
    .await;

    let report = fetcher(&server, 50, 10).fetch_report(&ids).await;

    assert_eq!(report.batches, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.records.len(), 100);

    let failure = &report.failures[0];
    assert_eq!(failure.index, 1);
    assert_eq!(failure.first_id, Some(1050));
    assert_eq!(failure.len, 50);
    assert!(failure.reason.contains("500"), "reason: {}", failure.reason);

    let expected: Vec<ProblemId> = ids[0..50].iter().chain(&ids[100..150]).copied().collect();
    assert_eq!(sorted_ids(&report.records), expected);
}

#[tokio::test]
async fn test_empty_array_is_success_not_failure() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = vec![99998, 99999];
    mount_lookup(&server, &ids, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let report = fetcher(&server, 50, 10).fetch_report(&ids).await;

    assert_eq!(report.batches, 1);
    assert_eq!(report.succeeded, 1);
    assert!(report.failures.is_empty());
    assert!(report.records.is_empty());
}

#[tokio::test]
async fn test_malformed_body_counts_as_failure() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = (1000..1060).collect();
    mount_lookup(
        &server,
        &ids[0..50],
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;
    mount_lookup(
        &server,
        &ids[50..60],
        ResponseTemplate::new(200).set_body_json(lookup_body(&ids[50..60])),
    )
    .await;

    let report = fetcher(&server, 50, 2).fetch_report(&ids).await;

    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].index, 0);
    assert_eq!(report.records.len(), 10);
}

#[tokio::test]
async fn test_non_object_items_are_rejected() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = vec![1000, 1001];
    mount_lookup(&server, &ids, ResponseTemplate::new(200).set_body_json(json!([1000, 1001])))
        .await;

    let client = LookupClient::new(&lookup_config(&server, 50, 1)).expect("client");
    let err = client.lookup(&ids).await.expect_err("numbers are not records");
    assert!(matches!(err, SolvedexError::Parse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_client_reports_status() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = vec![1000];
    mount_lookup(&server, &ids, ResponseTemplate::new(429)).await;

    let client = LookupClient::new(&lookup_config(&server, 50, 1)).expect("client");
    let err = client.lookup(&ids).await.expect_err("429 is not success");
    assert!(matches!(err, SolvedexError::HttpStatus { status: 429 }), "got {:?}", err);
}

#[tokio::test]
async fn test_records_keep_response_order_within_batch() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = vec![1000, 1001, 1002];
    let reversed = json!([problem(1002), problem(1000), problem(1001)]);
    mount_lookup(&server, &ids, ResponseTemplate::new(200).set_body_json(reversed)).await;

    let records = fetcher(&server, 50, 10).fetch(&ids).await;

    let order: Vec<u64> = records
        .iter()
        .filter_map(|r| r.get("problemId").and_then(|v| v.as_u64()))
        .collect();
    assert_eq!(order, vec![1002, 1000, 1001]);
    assert_eq!(records[0].get("titleKo"), Some(&json!("문제 1002")));
}

#[tokio::test]
async fn test_single_worker_runs_batches_one_at_a_time() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = (1000..1040).collect();
    let delay = Duration::from_millis(150);
    for chunk in ids.chunks(10) {
        mount_lookup(
            &server,
            chunk,
            ResponseTemplate::new(200)
                .set_body_json(lookup_body(chunk))
                .set_delay(delay),
        )
        .await;
    }

    let start = Instant::now();
    let records = fetcher(&server, 10, 1).fetch(&ids).await;

    assert_eq!(records.len(), 40);
    assert!(start.elapsed() >= delay * 4, "elapsed {:?}", start.elapsed());
}

#[tokio::test]
async fn test_three_workers_run_batches_in_parallel() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = (1000..1060).collect();
    let delay = Duration::from_millis(300);
    for chunk in ids.chunks(10) {
        mount_lookup(
            &server,
            chunk,
            ResponseTemplate::new(200)
                .set_body_json(lookup_body(chunk))
                .set_delay(delay),
        )
        .await;
    }

    let start = Instant::now();
    let records = fetcher(&server, 10, 3).fetch(&ids).await;
    let elapsed = start.elapsed();

    assert_eq!(sorted_ids(&records), ids);
    // Six batches over three workers take two rounds of the delay
    assert!(elapsed >= delay * 2, "elapsed {:?}", elapsed);
    assert!(elapsed < delay * 5, "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_request_timeout_fails_the_batch() {
    let server = MockServer::start().await;
    let ids: Vec<ProblemId> = vec![1000];
    mount_lookup(
        &server,
        &ids,
        ResponseTemplate::new(200)
            .set_body_json(lookup_body(&ids))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let mut config = lookup_config(&server, 50, 1);
    config.request_timeout_secs = Some(1);
    let report = BatchFetcher::from_config(&config)
        .expect("fetcher")
        .fetch_report(&ids)
        .await;

    assert_eq!(report.failed(), 1);
    assert!(report.records.is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = solvedex_ingest::LookupConfig {
        batch_size: 0,
        ..Default::default()
    };
    assert!(matches!(
        BatchFetcher::from_config(&config),
        Err(SolvedexError::Config(_))
    ));
}

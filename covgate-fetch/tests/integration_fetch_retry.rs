//! Integration tests: a scripted local API server driving the retry engine.
//!
//! Each test starts a minimal scripted HTTP server and asserts the request
//! counts, classifications and timing the engine must produce.

mod common;

use std::net::TcpListener;
use std::sync::Arc;
use std::time::{Duration, Instant};

use covgate_core::{ApiToken, RepoQuery};
use covgate_fetch::{fetch_repo_config, ApiClient, ErrorKind, FetchError, FetchOptions, RateGate};

use common::stub_api::{self, StubResponse};

const CONFIG_BODY: &str = r#"{"upload_token":"12e88c70-ffa1-4ca3-9de1-ae1f23a86a29"}"#;

fn client_for(base_url: &str) -> ApiClient {
    let token = ApiToken::new("sekrit-token").unwrap();
    ApiClient::new(base_url.parse().unwrap(), token).unwrap()
}

fn query() -> RepoQuery {
    RepoQuery::new("github", "acme", "widget").unwrap()
}

/// Options with sub-second delays so failure paths stay fast.
fn fast_options() -> FetchOptions {
    FetchOptions::new()
        .with_base_backoff(Duration::from_millis(10))
        .with_redirect_settle(Duration::from_millis(10))
}

#[tokio::test]
async fn test_first_success_makes_exactly_one_request() {
    let server = stub_api::start(vec![StubResponse::ok(CONFIG_BODY)]);
    let client = client_for(&server.base_url);

    let config = fetch_repo_config(&client, &query(), &fast_options())
        .await
        .expect("first attempt should succeed");

    assert_eq!(config.upload_token, "12e88c70-ffa1-4ca3-9de1-ae1f23a86a29");
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_request_carries_bearer_auth_and_config_path() {
    let server = stub_api::start(vec![StubResponse::ok(CONFIG_BODY)]);
    let client = client_for(&server.base_url);

    fetch_repo_config(&client, &query(), &fast_options())
        .await
        .expect("fetch should succeed");

    let seen = server.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/api/v2/github/acme/repos/widget/config/");
    assert_eq!(seen[0].authorization.as_deref(), Some("bearer sekrit-token"));
}

#[tokio::test]
async fn test_all_504_exhausts_budget_with_exact_attempt_count() {
    let server = stub_api::start(vec![StubResponse::status(504)]);
    let client = client_for(&server.base_url);
    let options = fast_options().with_max_retries(3);

    let err = fetch_repo_config(&client, &query(), &options)
        .await
        .expect_err("every attempt returns 504");

    // max_retries = 3 means 4 total attempts.
    assert_eq!(server.hits(), 4);
    assert_eq!(err.kind(), ErrorKind::Temporary);
    assert!(matches!(err, FetchError::Unavailable(status) if status.as_u16() == 504));
}

#[tokio::test]
async fn test_recovers_when_third_attempt_succeeds() {
    let server = stub_api::start(vec![
        StubResponse::status(504),
        StubResponse::status(504),
        StubResponse::ok(CONFIG_BODY),
    ]);
    let client = client_for(&server.base_url);

    let config = fetch_repo_config(&client, &query(), &fast_options())
        .await
        .expect("third attempt should succeed");

    assert_eq!(config.upload_token, "12e88c70-ffa1-4ca3-9de1-ae1f23a86a29");
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn test_unexpected_status_aborts_immediately() {
    let server = stub_api::start(vec![StubResponse::status(418)]);
    let client = client_for(&server.base_url);
    // A long backoff would show up in the elapsed time if the engine
    // wrongly retried.
    let options = FetchOptions::new()
        .with_base_backoff(Duration::from_secs(3))
        .with_redirect_settle(Duration::from_millis(10));

    let started = Instant::now();
    let err = fetch_repo_config(&client, &query(), &options)
        .await
        .expect_err("418 is fatal");

    assert_eq!(server.hits(), 1);
    assert_eq!(err.kind(), ErrorKind::Fatal);
    assert!(matches!(err, FetchError::UnexpectedStatus(status) if status.as_u16() == 418));
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "fatal errors must not back off"
    );
}

#[tokio::test]
async fn test_undecodable_body_aborts_immediately() {
    let server = stub_api::start(vec![StubResponse::ok("<html>settings page</html>")]);
    let client = client_for(&server.base_url);

    let err = fetch_repo_config(&client, &query(), &fast_options())
        .await
        .expect_err("an HTML body is not configuration");

    assert_eq!(server.hits(), 1);
    assert_eq!(err.kind(), ErrorKind::Fatal);
    assert!(matches!(err, FetchError::InvalidBody(_)));
    assert!(!err.should_retry());
}

#[tokio::test]
async fn test_connection_refused_aborts_after_first_attempt() {
    // Bind to grab a free port, then drop the listener so connections are
    // refused.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}"));
    let options = FetchOptions::new()
        .with_max_retries(2)
        .with_base_backoff(Duration::from_secs(2));

    let started = Instant::now();
    let err = fetch_repo_config(&client, &query(), &options)
        .await
        .expect_err("nothing is listening");

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    assert!(!err.should_retry(), "connection refused is not transient");
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "a refused connection must abort without backoff"
    );
}

#[tokio::test]
async fn test_redirect_settle_delay_is_applied() {
    let server = stub_api::start(vec![
        StubResponse::redirect(307),
        StubResponse::ok(CONFIG_BODY),
    ]);
    let client = client_for(&server.base_url);
    let options = FetchOptions::new()
        .with_base_backoff(Duration::from_millis(100))
        .with_redirect_settle(Duration::from_millis(500));

    let started = Instant::now();
    let config = fetch_repo_config(&client, &query(), &options)
        .await
        .expect("second attempt should succeed");
    let elapsed = started.elapsed();

    assert_eq!(config.upload_token, "12e88c70-ffa1-4ca3-9de1-ae1f23a86a29");
    assert_eq!(server.hits(), 2);
    // One settle delay (500ms) plus one backoff (100ms).
    assert!(
        elapsed >= Duration::from_millis(450),
        "settle delay missing, elapsed {elapsed:?}"
    );
    assert!(
        elapsed <= Duration::from_millis(650),
        "unexpected extra delay, elapsed {elapsed:?}"
    );
}

#[tokio::test]
async fn test_deadline_cancels_midway() {
    let server = stub_api::start(vec![StubResponse::status(504)]);
    let client = client_for(&server.base_url);
    let options = fast_options()
        .with_base_backoff(Duration::from_millis(200))
        .with_deadline(Duration::from_millis(350));

    let started = Instant::now();
    let err = fetch_repo_config(&client, &query(), &options)
        .await
        .expect_err("deadline fires during backoff");
    let elapsed = started.elapsed();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(matches!(err, FetchError::Cancelled));
    assert!(server.hits() >= 1, "at least one attempt ran");
    assert!(
        elapsed >= Duration::from_millis(300) && elapsed < Duration::from_millis(600),
        "cancellation should be prompt, elapsed {elapsed:?}"
    );
}

#[tokio::test]
async fn test_shared_gate_paces_sequential_fetches() {
    let server = stub_api::start(vec![StubResponse::ok(CONFIG_BODY)]);
    let client = client_for(&server.base_url);
    let gate = Arc::new(RateGate::new(Duration::from_millis(100)));
    let options = fast_options().with_rate_gate(Arc::clone(&gate));

    let started = Instant::now();
    fetch_repo_config(&client, &query(), &options).await.unwrap();
    fetch_repo_config(&client, &query(), &options).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(server.hits(), 2);
    // First permit near 100ms, second near 200ms.
    assert!(
        elapsed >= Duration::from_millis(190),
        "gate should pace both fetches, elapsed {elapsed:?}"
    );
}

#[tokio::test]
async fn test_shared_gate_paces_concurrent_fetches() {
    let server = stub_api::start(vec![
        StubResponse::ok(CONFIG_BODY),
        StubResponse::ok(CONFIG_BODY),
    ]);
    let client = client_for(&server.base_url);
    let gate = Arc::new(RateGate::new(Duration::from_millis(100)));
    let options = fast_options().with_rate_gate(gate);

    let started = Instant::now();
    let first_query = query();
    let second_query = query();
    let (first, second) = tokio::join!(
        fetch_repo_config(&client, &first_query, &options),
        fetch_repo_config(&client, &second_query, &options),
    );
    let elapsed = started.elapsed();

    first.expect("first concurrent fetch");
    second.expect("second concurrent fetch");
    assert_eq!(server.hits(), 2);
    // Each invocation must consume its own tick; a double-granted tick
    // would finish both near 100ms.
    assert!(
        elapsed >= Duration::from_millis(190),
        "concurrent fetches must not share a tick, elapsed {elapsed:?}"
    );
}

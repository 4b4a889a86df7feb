//! The fixture from the caller's side: a retrying client always gets through.

use std::time::Duration;

use flaky_backend::fixture::{DispatchMode, FailureVariant};

mod common;

/// Minimal client-side retry: up to `max_attempts`, retrying 5xx.
async fn get_with_retries(client: &reqwest::Client, url: &str, max_attempts: u32) -> (u16, u32) {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let res = client.get(url).send().await.expect("fixture unreachable");
        let status = res.status();
        if !status.is_server_error() || attempts >= max_attempts {
            return (status.as_u16(), attempts);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn test_retry_on_failure() {
    for failure in [FailureVariant::InternalServerError, FailureVariant::ServiceUnavailable] {
        let fixture = common::start_fixture(failure, DispatchMode::Locked).await;
        let client = common::client();

        // Three logical requests, as a proxy with automatic retries would issue them.
        for _ in 0..3 {
            let (status, attempts) = get_with_retries(&client, &fixture.url(), 3).await;
            assert_eq!(status, 200, "should eventually succeed after retries");
            assert_eq!(attempts, 3);
        }

        fixture.stop().await;
    }
}

#[tokio::test]
async fn test_without_retries_caller_sees_failure() {
    let fixture = common::start_fixture(FailureVariant::ServiceUnavailable, DispatchMode::Sequential).await;
    let client = common::client();

    let (status, attempts) = get_with_retries(&client, &fixture.url(), 1).await;
    assert_eq!((status, attempts), (503, 1));

    fixture.stop().await;
}

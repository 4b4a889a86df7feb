//! Shared utilities for integration and load testing.

use std::net::SocketAddr;

use flaky_backend::config::FixtureConfig;
use flaky_backend::fixture::{DispatchMode, FailureVariant};
use flaky_backend::lifecycle::{self, RunningFixture, Shutdown};

/// A fixture running on an ephemeral localhost port.
pub struct TestFixture {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    running: RunningFixture,
}

impl TestFixture {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Stop the fixture and wait for it to exit.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.running.wait().await.unwrap();
    }
}

/// Start a fixture with the given failure variant and dispatch mode.
pub async fn start_fixture(failure: FailureVariant, dispatch: DispatchMode) -> TestFixture {
    let mut config = FixtureConfig::default();
    config.fixture.failure_status = failure.into();
    config.fixture.dispatch = dispatch;
    start_with_config(config).await
}

/// Start a fixture from a full config; the bind address is forced to 127.0.0.1:0.
pub async fn start_with_config(mut config: FixtureConfig) -> TestFixture {
    config.listener.bind_address = "127.0.0.1:0".into();

    let shutdown = Shutdown::new();
    let running = lifecycle::start(config, &shutdown).await.unwrap();

    TestFixture {
        addr: running.local_addr,
        shutdown,
        running,
    }
}

#[allow(dead_code)]
/// Client that opens a fresh connection per request.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[allow(dead_code)]
/// Send one GET and return status and body.
pub async fn get(client: &reqwest::Client, url: &str) -> (u16, String) {
    let res = client.get(url).send().await.expect("fixture unreachable");
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}

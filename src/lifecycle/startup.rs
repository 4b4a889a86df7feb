//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the metrics exporter when enabled
//! - Validate the config and build the server (and its counter)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::{ConfigError, FixtureConfig};
use crate::http::FlakyServer;
use crate::lifecycle::Shutdown;
use crate::net::{self, ListenerError};
use crate::observability::metrics;

/// Errors that stop the fixture from starting or keep it from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Invalid metrics address: {0}")]
    MetricsAddress(String),

    #[error("Failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A fixture accepting connections in a background task.
pub struct RunningFixture {
    /// Address actually bound (resolves port 0).
    pub local_addr: SocketAddr,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningFixture {
    /// Wait for the server to stop.
    pub async fn wait(self) -> Result<(), StartupError> {
        self.handle.await??;
        Ok(())
    }
}

/// Start serving `config` until `shutdown` fires.
pub async fn start(config: FixtureConfig, shutdown: &Shutdown) -> Result<RunningFixture, StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let server = FlakyServer::new(config)?;

    let listener = net::bind(&server.config().listener).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Ok(RunningFixture { local_addr, handle })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let mut config = FixtureConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();

        let shutdown = Shutdown::new();
        let running = start(config, &shutdown).await.unwrap();
        assert_ne!(running.local_addr.port(), 0);

        shutdown.trigger();
        running.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_port_in_use_is_a_startup_error() {
        let shutdown = Shutdown::new();
        let mut config = FixtureConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        let first = start(config.clone(), &shutdown).await.unwrap();

        config.listener.bind_address = first.local_addr.to_string();
        let err = start(config, &shutdown).await.err().unwrap();
        assert!(matches!(err, StartupError::Listener(ListenerError::Bind(..))));

        shutdown.trigger();
        first.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_unparseable_metrics_address() {
        let mut config = FixtureConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let err = start(config, &Shutdown::new()).await.err().unwrap();
        assert!(matches!(err, StartupError::MetricsAddress(ref addr) if addr == "nowhere"));
    }

    #[tokio::test]
    async fn test_invalid_config_never_binds() {
        let mut config = FixtureConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.fixture.success_every = 0;

        let err = start(config, &Shutdown::new()).await.err().unwrap();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
    }
}

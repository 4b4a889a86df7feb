//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the flaky handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Own the per-instance request counter
//! - Serve on a listener until shutdown is signalled

use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, FixtureConfig};
use crate::fixture::{FlakyPattern, RequestCounter};
use crate::http::handlers::flaky_handler;
use crate::http::request::UuidRequestId;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub counter: RequestCounter,
    pub pattern: FlakyPattern,
}

/// HTTP server for the flaky fixture.
///
/// Each `FlakyServer` owns a fresh counter, so a new instance restarts the
/// cycle at request 1.
pub struct FlakyServer {
    router: Router,
    config: FixtureConfig,
    pattern: FlakyPattern,
}

impl FlakyServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The configuration is validated first. Must be called inside a tokio
    /// runtime when the dispatch mode is sequential.
    pub fn new(config: FixtureConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let pattern = config.pattern()?;

        let state = AppState {
            counter: RequestCounter::new(config.fixture.dispatch),
            pattern,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            pattern,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &FixtureConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(flaky_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The router, for driving the fixture without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Run the server until a shutdown signal arrives on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let pattern = self.pattern;
        tracing::info!(
            address = %addr,
            failure_status = %pattern.failure(),
            success_every = pattern.success_every(),
            dispatch = %self.config.fixture.dispatch,
            "Flaky fixture serving"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                // A closed channel means the coordinator is gone; stop either way.
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

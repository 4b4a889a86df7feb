//! Flaky backend fixture (v1)
//!
//! Serves `GET /` with a deterministic failure/success cycle driven by a
//! request counter:
//!
//! ```text
//! request #   1        2        3         4        5        6
//! response    500/503  500/503  200       500/503  500/503  200
//! body        Failure! Failure! Success!  Failure! Failure! Success!
//! ```
//!
//! The failure status (500 or 503) is picked at startup and fixed for the
//! lifetime of the process. Restarting resets the cycle.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use flaky_backend::config::{self, LogFormat, Overrides};
use flaky_backend::fixture::{DispatchMode, FailureVariant};
use flaky_backend::lifecycle::{self, signals, Shutdown};
use flaky_backend::observability::logging;

#[derive(Parser)]
#[command(name = "flaky-backend")]
#[command(about = "HTTP fixture that fails twice, succeeds once, and repeats", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, e.g. 127.0.0.1:8080.
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on, keeping the configured host.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Status for failing requests: 500 or 503.
    #[arg(long)]
    failure_status: Option<FailureVariant>,

    /// Every n-th request succeeds.
    #[arg(long)]
    success_every: Option<u64>,

    /// How counter increments are serialized.
    #[arg(long, value_enum)]
    dispatch: Option<DispatchMode>,

    /// Log output format.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            bind_address: self.bind.clone(),
            port: self.port,
            failure_status: self.failure_status,
            success_every: self.success_every,
            dispatch: self.dispatch,
            log_format: self.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::resolve(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("flaky-backend: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("flaky-backend: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!("flaky-backend v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let result = match lifecycle::start(config, &shutdown).await {
        Ok(running) => running.wait().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fixture failed");
            eprintln!("flaky-backend: {}", e);
            ExitCode::FAILURE
        }
    }
}

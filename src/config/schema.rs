//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the fixture.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::fixture::{DispatchMode, FailureVariant, FlakyPattern, StatusSetting, UnknownVariant};

/// Root configuration for the flaky fixture.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FixtureConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Failure/success cycle and dispatch settings.
    pub fixture: FlakyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl FixtureConfig {
    /// The pattern this configuration describes.
    pub fn pattern(&self) -> Result<FlakyPattern, UnknownVariant> {
        Ok(FlakyPattern::new(
            self.fixture.success_every,
            self.fixture.failure_status.variant()?,
        ))
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Fixture behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlakyConfig {
    /// Status for failing requests (500 or 503), checked by validation.
    pub failure_status: StatusSetting,

    /// Every n-th request succeeds.
    pub success_every: u64,

    /// How counter increments are serialized.
    pub dispatch: DispatchMode,
}

impl Default for FlakyConfig {
    fn default() -> Self {
        Self {
            failure_status: FailureVariant::InternalServerError.into(),
            success_every: FlakyPattern::DEFAULT_SUCCESS_EVERY,
            dispatch: DispatchMode::Locked,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

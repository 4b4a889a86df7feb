//! Failure/success pattern.
//!
//! Maps a counter value to the response the fixture hands out. With the
//! default divisor of 3 the cycle is `fail, fail, succeed, fail, ...`.

use std::fmt;
use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body returned on the succeeding request of each cycle.
pub const SUCCESS_BODY: &str = "Success!";

/// Body returned on every failing request.
pub const FAILURE_BODY: &str = "Failure!";

/// Status code used for simulated failures.
///
/// Chosen at deployment time; an instance never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FailureVariant {
    /// 500 Internal Server Error.
    #[default]
    InternalServerError,
    /// 503 Service Unavailable.
    ServiceUnavailable,
}

impl FailureVariant {
    pub fn status(self) -> StatusCode {
        match self {
            FailureVariant::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            FailureVariant::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Error for an unsupported failure status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported failure status `{0}` (expected 500 or 503)")]
pub struct UnknownVariant(pub String);

impl TryFrom<u16> for FailureVariant {
    type Error = UnknownVariant;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            500 => Ok(FailureVariant::InternalServerError),
            503 => Ok(FailureVariant::ServiceUnavailable),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl From<FailureVariant> for u16 {
    fn from(variant: FailureVariant) -> Self {
        variant.status().as_u16()
    }
}

impl FromStr for FailureVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "500" | "internal-server-error" => Ok(FailureVariant::InternalServerError),
            "503" | "service-unavailable" => Ok(FailureVariant::ServiceUnavailable),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for FailureVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status())
    }
}

/// Failure status as written in a config file.
///
/// Accepts both `failure_status = 503` and `failure_status = "503"`. The
/// value is only checked by validation, so an unsupported status is reported
/// alongside every other problem in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StatusSetting {
    Code(u16),
    Name(String),
}

impl StatusSetting {
    pub fn variant(&self) -> Result<FailureVariant, UnknownVariant> {
        match self {
            StatusSetting::Code(code) => FailureVariant::try_from(*code),
            StatusSetting::Name(name) => name.parse(),
        }
    }
}

impl Default for StatusSetting {
    fn default() -> Self {
        FailureVariant::default().into()
    }
}

impl From<FailureVariant> for StatusSetting {
    fn from(variant: FailureVariant) -> Self {
        StatusSetting::Code(variant.into())
    }
}

impl fmt::Display for StatusSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusSetting::Code(code) => write!(f, "{}", code),
            StatusSetting::Name(name) => write!(f, "{}", name),
        }
    }
}

/// What a single request gets back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(StatusCode),
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Success => StatusCode::OK,
            Outcome::Failure(status) => *status,
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            Outcome::Success => SUCCESS_BODY,
            Outcome::Failure(_) => FAILURE_BODY,
        }
    }

    /// Label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure(_) => "failure",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        (self.status(), self.body()).into_response()
    }
}

/// The deterministic cycle: every `success_every`-th request succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlakyPattern {
    success_every: u64,
    failure: FailureVariant,
}

impl FlakyPattern {
    /// Divisor used when nothing else is configured.
    pub const DEFAULT_SUCCESS_EVERY: u64 = 3;

    /// Build a pattern. A divisor of zero is clamped to one (always succeed);
    /// config validation rejects it before it gets here.
    pub fn new(success_every: u64, failure: FailureVariant) -> Self {
        Self {
            success_every: success_every.max(1),
            failure,
        }
    }

    pub fn success_every(&self) -> u64 {
        self.success_every
    }

    pub fn failure(&self) -> FailureVariant {
        self.failure
    }

    /// Outcome for the request that observed counter value `n` (1-indexed).
    pub fn outcome_for(&self, n: u64) -> Outcome {
        if n % self.success_every == 0 {
            Outcome::Success
        } else {
            Outcome::Failure(self.failure.status())
        }
    }
}

impl Default for FlakyPattern {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SUCCESS_EVERY, FailureVariant::default())
    }
}

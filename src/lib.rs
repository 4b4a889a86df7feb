//! Flaky backend test fixture library.
//!
//! An HTTP server whose `GET /` fails twice, succeeds once, and repeats,
//! for exercising retry, backoff and circuit-breaker logic in callers.

pub mod config;
pub mod fixture;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::FixtureConfig;
pub use fixture::{DispatchMode, FailureVariant, FlakyPattern, Outcome};
pub use http::FlakyServer;
pub use lifecycle::Shutdown;

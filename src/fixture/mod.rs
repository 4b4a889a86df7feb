//! Flaky fixture core.
//!
//! # Data Flow
//! ```text
//! request arrives at GET /
//!     → counter.rs (increment-and-read, serialized per dispatch mode)
//!     → pattern.rs (n → Success | Failure(status))
//!     → Outcome rendered as the HTTP response
//! ```
//!
//! # Design Decisions
//! - The counter is owned by the server instance, never a process global
//! - Failure variant is fixed for the lifetime of an instance
//! - Dispatch mode (locked vs sequential) is a configuration choice

pub mod counter;
pub mod pattern;

pub use counter::{CounterError, DispatchMode, RequestCounter};
pub use pattern::{FailureVariant, FlakyPattern, Outcome, StatusSetting, UnknownVariant};

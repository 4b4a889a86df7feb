//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and lifecycle produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log event of a request
//! - Metrics are cheap; with no exporter installed they are no-ops

pub mod logging;
pub mod metrics;

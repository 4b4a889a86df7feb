//! Metrics collection and exposition.
//!
//! # Metrics
//! - `flaky_requests_total` (counter): requests served, by outcome and status
//! - `flaky_request_duration_seconds` (histogram): handler latency
//! - `flaky_request_counter` (gauge): latest counter value handed out

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::fixture::Outcome;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must run inside a tokio runtime; the exporter's listener is spawned on it.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one served request.
pub fn record_request(outcome: &Outcome, count: u64, start_time: Instant) {
    let status = outcome.status().as_u16().to_string();

    metrics::counter!("flaky_requests_total", "outcome" => outcome.label(), "status" => status)
        .increment(1);
    metrics::histogram!("flaky_request_duration_seconds").record(start_time.elapsed().as_secs_f64());
    metrics::gauge!("flaky_request_counter").set(count as f64);
}

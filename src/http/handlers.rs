//! The flaky endpoint.

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::request::request_id_of;
use crate::http::server::AppState;
use crate::observability::metrics;

/// `GET /`: advance the counter and answer per the configured pattern.
pub async fn flaky_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start_time = Instant::now();
    let request_id = request_id_of(&headers);

    let n = match state.counter.next().await {
        Ok(n) => n,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Request counter unavailable");
            return (StatusCode::INTERNAL_SERVER_ERROR, "counter unavailable").into_response();
        }
    };

    let outcome = state.pattern.outcome_for(n);

    tracing::debug!(
        request_id = %request_id,
        count = n,
        outcome = outcome.label(),
        status = outcome.status().as_u16(),
        "Served flaky response"
    );
    metrics::record_request(&outcome, n, start_time);

    outcome.into_response()
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `guard_requests_total` (counter): requests seen by header validation, by outcome
//! - `guard_header_failures_total` (counter): failures by header and reason
//! - `guard_panics_total` (counter): handler panics turned into 500s
//! - `guard_schema_reloads_total` (counter): config reloads by result
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter serves its own HTTP listener

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::validation::ValidationFailure;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| e.to_string())?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record an accepted request.
pub fn record_accepted() {
    counter!("guard_requests_total", "outcome" => "accepted").increment(1);
}

/// Record a rejected request and each failure behind it.
pub fn record_rejected(failures: &[ValidationFailure]) {
    counter!("guard_requests_total", "outcome" => "rejected").increment(1);
    for failure in failures {
        counter!(
            "guard_header_failures_total",
            "header" => failure.header.clone(),
            "reason" => failure.reason.as_str()
        )
        .increment(1);
    }
}

/// Record a panic caught by the recovery layer.
pub fn record_panic() {
    counter!("guard_panics_total").increment(1);
}

/// Record a schema reload attempt.
pub fn record_schema_reload(applied: bool) {
    let result = if applied { "applied" } else { "rejected" };
    counter!("guard_schema_reloads_total", "result" => result).increment(1);
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_rest_requests_total` (counter): forwarded REST calls by operation, status
//! - `relay_rest_request_duration_seconds` (histogram): upstream round-trip latency
//! - `relay_ws_sessions_active` (gauge): live relay sessions
//! - `relay_ws_sessions_total` (counter): finished sessions by outcome
//! - `relay_ws_messages_total` (counter): relayed frames by direction
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one forwarded REST call.
pub fn record_forward(operation: &'static str, status: u16, start: Instant) {
    counter!(
        "relay_rest_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("relay_rest_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

pub fn session_opened() {
    gauge!("relay_ws_sessions_active").increment(1.0);
}

pub fn session_closed(outcome: &'static str) {
    gauge!("relay_ws_sessions_active").decrement(1.0);
    counter!("relay_ws_sessions_total", "outcome" => outcome).increment(1);
}

pub fn message_relayed(direction: &'static str) {
    counter!("relay_ws_messages_total", "direction" => direction).increment(1);
}

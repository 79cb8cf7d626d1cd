//! Metrics collection and exposition.
//!
//! # Metrics
//! - `reroute_http_requests_total` (counter): requests by method, path, status
//! - `reroute_http_request_duration_seconds` (histogram): latency distribution
//! - `reroute_renders_total` (counter): response renders by mode
//! - `reroute_deprecation_warnings_total` (counter): warnings by key
//! - `reroute_commands_total` (counter): commands by name and decision
//! - `reroute_cluster_state_version` (gauge): last published state version
//!
//! # Design Decisions
//! - The `metrics` facade is always called; without an installed recorder
//!   every call is a no-op, which keeps tests exporter-free
//! - The Prometheus exporter is opt-in via config

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("reroute_http_requests_total", &labels).increment(1);
    histogram!("reroute_http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_render(mode: &'static str) {
    counter!("reroute_renders_total", "mode" => mode).increment(1);
}

pub fn record_deprecation(key: &str) {
    counter!("reroute_deprecation_warnings_total", "key" => key.to_string()).increment(1);
}

pub fn record_command(command: &'static str, decision: &'static str) {
    counter!("reroute_commands_total", "command" => command, "decision" => decision).increment(1);
}

pub fn record_state_version(version: u64) {
    gauge!("reroute_cluster_state_version").set(version as f64);
}

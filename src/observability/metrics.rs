//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): proxied requests by method, status, provider
//! - `gateway_request_duration_seconds` (histogram): latency by provider
//! - `gateway_upstream_errors_total` (counter): upstream failures by kind
//! - `gateway_links_created_total` (counter): issued links by provider
//!
//! Recording is fire-and-forget; when no exporter is installed the macros
//! are no-ops, so tests and the CLI never pay for them.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

/// Record one completed proxied request.
pub fn record_request(method: &str, status: u16, provider: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "provider" => provider.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "provider" => provider.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record an upstream failure by error kind.
pub fn record_upstream_error(kind: &'static str) {
    counter!("gateway_upstream_errors_total", "kind" => kind).increment(1);
}

/// Record an issued payment link.
pub fn record_link_created(provider: &'static str) {
    counter!("gateway_links_created_total", "provider" => provider).increment(1);
}

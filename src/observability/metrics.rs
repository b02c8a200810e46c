//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): forwarded requests by service, status
//! - `gateway_request_duration_seconds` (histogram): upstream latency by service
//! - `gateway_auth_rejections_total` (counter): 401 responses by reason
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is optional and owns its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record a forwarded request.
pub fn record_request(service: &str, status: u16, start: Instant) {
    let service = service.to_string();
    metrics::counter!(
        "gateway_requests_total",
        "service" => service.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Record a request rejected by the access gate.
pub fn record_auth_rejection(reason: &'static str) {
    metrics::counter!("gateway_auth_rejections_total", "reason" => reason).increment(1);
}

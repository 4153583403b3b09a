//! Metrics collection and exposition.
//!
//! # Metrics
//! - `catalog_inserts_total` (counter): exchanges recorded, by outcome (created/updated)
//! - `catalog_parameterize_total` (counter): parameterize calls, by outcome (ok/rejected)
//! - `catalog_routes` (gauge): registered patterns per host
//!
//! # Design Decisions
//! - Recording without an installed recorder is a no-op (tests, library use)
//! - Prometheus exporter only started by the service binary

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_insert(created: bool) {
    let outcome = if created { "created" } else { "updated" };
    ::metrics::counter!("catalog_inserts_total", "outcome" => outcome).increment(1);
}

pub fn record_parameterize(ok: bool) {
    let outcome = if ok { "ok" } else { "rejected" };
    ::metrics::counter!("catalog_parameterize_total", "outcome" => outcome).increment(1);
}

pub fn record_route_count(host: &str, routes: usize) {
    ::metrics::gauge!("catalog_routes", "host" => host.to_string()).set(routes as f64);
}

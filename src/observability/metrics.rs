//! Metrics collection and exposition.
//!
//! # Metrics
//! - `board_connect_total` (counter): connect attempts by outcome
//! - `board_attestations_total` (counter): attestation calls by outcome
//! - `board_attestation_duration_seconds` (histogram): attestation latency
//! - `board_posts_total` (counter): messages appended
//! - `board_messages` (gauge): messages currently held
//! - `board_rpc_health` (gauge): 1=reachable, 0=unreachable
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; a no-op until a recorder
//!   is installed
//! - The Prometheus exporter is optional and off by default

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_connect(outcome: &'static str) {
    metrics::counter!("board_connect_total", "outcome" => outcome).increment(1);
}

pub fn record_attestation(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("board_attestations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("board_attestation_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_post() {
    metrics::counter!("board_posts_total").increment(1);
}

pub fn record_store_size(len: usize) {
    metrics::gauge!("board_messages").set(len as f64);
}

pub fn record_rpc_health(healthy: bool) {
    metrics::gauge!("board_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}

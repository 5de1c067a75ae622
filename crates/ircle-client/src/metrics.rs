//! Session metrics.
//!
//! Uses the `metrics` crate for instrumentation. Nothing is exported
//! unless the application installs a recorder (the `ircle` binary can
//! install the Prometheus exporter).

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// Metric names.
pub mod names {
    pub const LINES_RECEIVED_TOTAL: &str = "ircle_lines_received_total";
    pub const LINES_SENT_TOTAL: &str = "ircle_lines_sent_total";
    pub const BYTES_RECEIVED_TOTAL: &str = "ircle_bytes_received_total";
    pub const BYTES_SENT_TOTAL: &str = "ircle_bytes_sent_total";
    pub const PARSE_FAILURES_TOTAL: &str = "ircle_parse_failures_total";
    pub const NETWORK_ERRORS_TOTAL: &str = "ircle_network_errors_total";
    pub const PROTOCOL_ERRORS_TOTAL: &str = "ircle_protocol_errors_total";
}

/// Register metric descriptions.
pub fn describe_metrics() {
    metrics::describe_counter!(names::LINES_RECEIVED_TOTAL, "Total number of lines received");
    metrics::describe_counter!(names::LINES_SENT_TOTAL, "Total number of lines sent");
    metrics::describe_counter!(names::BYTES_RECEIVED_TOTAL, "Total bytes read from the stream");
    metrics::describe_counter!(names::BYTES_SENT_TOTAL, "Total bytes written to the stream");
    metrics::describe_counter!(
        names::PARSE_FAILURES_TOTAL,
        "Total number of received lines dropped as malformed"
    );
    metrics::describe_counter!(
        names::NETWORK_ERRORS_TOTAL,
        "Total number of network-error events"
    );
    metrics::describe_counter!(
        names::PROTOCOL_ERRORS_TOTAL,
        "Total number of numeric error replies received"
    );
}

/// Start the Prometheus metrics endpoint.
///
/// # Errors
///
/// Returns an error if the exporter cannot be installed.
pub fn start_metrics_server(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    info!("Metrics server listening on {}", addr);
    Ok(())
}

/// Record bytes read from the stream.
pub fn record_bytes_received(bytes: usize) {
    counter!(names::BYTES_RECEIVED_TOTAL).increment(bytes as u64);
}

/// Record a complete line received.
pub fn record_line_received() {
    counter!(names::LINES_RECEIVED_TOTAL).increment(1);
}

/// Record a line written to the stream.
pub fn record_line_sent(bytes: usize) {
    counter!(names::LINES_SENT_TOTAL).increment(1);
    counter!(names::BYTES_SENT_TOTAL).increment(bytes as u64);
}

/// Record a dropped malformed line.
pub fn record_parse_failure() {
    counter!(names::PARSE_FAILURES_TOTAL).increment(1);
}

/// Record a network-error event.
pub fn record_network_error() {
    counter!(names::NETWORK_ERRORS_TOTAL).increment(1);
}

/// Record a numeric error reply.
pub fn record_protocol_error(code: &str) {
    counter!(names::PROTOCOL_ERRORS_TOTAL, "code" => code.to_string()).increment(1);
}

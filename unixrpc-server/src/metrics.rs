//! Server metrics definitions
//!
//! OpenTelemetry instruments for session and request activity. Without a
//! registered meter provider (see `ObservabilityConfig::with_metrics`) they
//! are no-ops, so recording is always safe.
//!
//! # Metrics Collected
//!
//! - **connections_active**: sessions currently open (gauge)
//! - **connections_total**: sessions accepted since startup (counter)
//! - **requests_total**: requests dispatched, by method and status (counter)
//! - **request_duration**: decode-to-write latency (histogram)
//! - **errors_total**: session-ending errors, by kind (counter)

use opentelemetry::{
    global,
    metrics::{Counter, Gauge, Histogram, Meter},
    KeyValue,
};

/// Server metrics for monitoring
///
/// All instruments are prefixed with `unixrpc.server.*`.
pub struct ServerMetrics {
    /// Number of open sessions
    pub connections_active: Gauge<i64>,
    /// Total number of accepted sessions
    pub connections_total: Counter<u64>,
    /// Total number of dispatched requests
    pub requests_total: Counter<u64>,
    /// Request processing duration in seconds
    pub request_duration: Histogram<f64>,
    /// Total number of session-ending errors
    pub errors_total: Counter<u64>,
}

impl ServerMetrics {
    /// Create metrics on the global meter named after the service
    pub fn new(service_name: impl Into<String>) -> Self {
        let name: &'static str = Box::leak(service_name.into().into_boxed_str());
        let meter = global::meter(name);
        Self::new_with_meter(&meter)
    }

    /// Create metrics on a specific meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            connections_active: meter
                .i64_gauge("unixrpc.server.connections.active")
                .with_description("Number of open sessions")
                .build(),
            connections_total: meter
                .u64_counter("unixrpc.server.connections.total")
                .with_description("Total number of accepted sessions")
                .build(),
            requests_total: meter
                .u64_counter("unixrpc.server.requests.total")
                .with_description("Total number of dispatched requests")
                .build(),
            request_duration: meter
                .f64_histogram("unixrpc.server.request.duration")
                .with_description("Request processing duration in seconds")
                .build(),
            errors_total: meter
                .u64_counter("unixrpc.server.errors.total")
                .with_description("Total number of session-ending errors")
                .build(),
        }
    }

    /// Record an accepted session
    pub fn record_connection(&self, active: i64) {
        self.connections_active.record(active, &[]);
        self.connections_total.add(1, &[]);
    }

    /// Record a closed session
    pub fn record_disconnection(&self, active: i64) {
        self.connections_active.record(active, &[]);
    }

    /// Record a dispatched request
    pub fn record_request(&self, method: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.requests_total.add(1, attributes);
        self.request_duration.record(duration_secs, attributes);
    }

    /// Record a session-ending error
    pub fn record_error(&self, error_type: &str) {
        let attributes = &[KeyValue::new("error_type", error_type.to_string())];
        self.errors_total.add(1, attributes);
    }
}

//! TwelveLabs request metrics.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total provider requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "twelvelabs_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "twelvelabs_latency_seconds";

    /// Bytes sent in file uploads.
    pub const UPLOAD_BYTES_TOTAL: &str = "twelvelabs_upload_bytes_total";
}

/// Record metrics for a completed provider request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record the size of an uploaded file.
pub fn record_upload_bytes(bytes: u64) {
    counter!(names::UPLOAD_BYTES_TOTAL).increment(bytes);
}

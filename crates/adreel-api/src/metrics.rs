//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus metrics recorder.
/// Returns a handle that renders the exposition text.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "adreel_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "adreel_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "adreel_http_requests_in_flight";

    // Video lifecycle
    pub const VIDEOS_SUBMITTED_TOTAL: &str = "adreel_videos_submitted_total";
    pub const STATUS_CHECKS_TOTAL: &str = "adreel_status_checks_total";
    pub const EDITS_PLANNED_TOTAL: &str = "adreel_edits_planned_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "adreel_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a submission by source kind (`file` or `url`).
pub fn record_video_submitted(source: &str) {
    let labels = [("source", source.to_string())];
    counter!(names::VIDEOS_SUBMITTED_TOTAL, &labels).increment(1);
}

/// Record a status check outcome (`polled`, `cached`, `failed`).
pub fn record_status_check(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::STATUS_CHECKS_TOTAL, &labels).increment(1);
}

/// Record a planned edit job and how many files it lays out.
pub fn record_edit_planned(files: usize) {
    counter!(names::EDITS_PLANNED_TOTAL).increment(1);
    histogram!("adreel_edit_files_per_job").record(files as f64);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

fn id_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"/videos/[A-Za-z0-9_-]+", "/videos/:video_id"),
            (r"/edits/[A-Za-z0-9_-]+", "/edits/:job_id"),
        ]
        .into_iter()
        .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
        .collect()
    })
}

/// Sanitize path for metrics labels (collapse ids into placeholders).
fn sanitize_path(path: &str) -> String {
    id_patterns()
        .iter()
        .fold(path.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Video ingestion outcomes and latency
//! - Compensating file cleanups performed by ingestion
//! - Database connection pool gauges

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace("short_video"),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace("short_video")
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Ingestion outcomes: committed, invalid_format, tool_error, io_error, timeout
pub static INGEST_OUTCOMES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ingest_outcomes_total", "Video ingestion results by outcome")
            .namespace("short_video"),
        &["outcome"],
    )
    .expect("Failed to create INGEST_OUTCOMES_TOTAL metric")
});

/// End-to-end ingestion latency, upload persisted to row committed
pub static INGEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0];
    HistogramVec::new(
        HistogramOpts::new("ingest_duration_seconds", "Video ingestion latency in seconds")
            .namespace("short_video")
            .buckets(buckets),
        &["outcome"],
    )
    .expect("Failed to create INGEST_DURATION_SECONDS metric")
});

/// Files removed after an aborted ingestion
pub static INGEST_CLEANUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ingest_cleanups_total", "Artifacts removed after failed ingestion")
            .namespace("short_video"),
        &["artifact", "result"], // artifact: "video" | "cover"; result: "removed" | "failed"
    )
    .expect("Failed to create INGEST_CLEANUPS_TOTAL metric")
});

/// Database connection pool stats
pub static DB_POOL_CONNECTIONS: Lazy<GaugeVec> = Lazy::new(|| {
    GaugeVec::new(
        Opts::new("db_pool_connections", "Database connection pool statistics")
            .namespace("short_video"),
        &["state"], // "idle", "active"
    )
    .expect("Failed to create DB_POOL_CONNECTIONS metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(INGEST_OUTCOMES_TOTAL.clone()))
        .expect("Failed to register INGEST_OUTCOMES_TOTAL");
    registry
        .register(Box::new(INGEST_DURATION_SECONDS.clone()))
        .expect("Failed to register INGEST_DURATION_SECONDS");
    registry
        .register(Box::new(INGEST_CLEANUPS_TOTAL.clone()))
        .expect("Failed to register INGEST_CLEANUPS_TOTAL");
    registry
        .register(Box::new(DB_POOL_CONNECTIONS.clone()))
        .expect("Failed to register DB_POOL_CONNECTIONS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record the result of one ingestion
pub fn record_ingest(outcome: &str, duration_secs: f64) {
    INGEST_OUTCOMES_TOTAL.with_label_values(&[outcome]).inc();
    INGEST_DURATION_SECONDS
        .with_label_values(&[outcome])
        .observe(duration_secs);
}

/// Helper to record a compensating file removal
pub fn record_cleanup(artifact: &str, removed: bool) {
    let result = if removed { "removed" } else { "failed" };
    INGEST_CLEANUPS_TOTAL
        .with_label_values(&[artifact, result])
        .inc();
}

/// Helper to update database pool stats
pub fn update_db_pool_stats(idle: u32, active: u32) {
    DB_POOL_CONNECTIONS
        .with_label_values(&["idle"])
        .set(idle as f64);
    DB_POOL_CONNECTIONS
        .with_label_values(&["active"])
        .set(active as f64);
}

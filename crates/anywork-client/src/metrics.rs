//! API gateway metrics collection.
//!
//! Provides standardized metrics for monitoring AnyWork API traffic:
//! - Request counters by method and status
//! - Latency histograms

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total API requests by method and status.
    pub const REQUESTS_TOTAL: &str = "anywork_api_requests_total";

    /// Request latency in seconds by method.
    pub const LATENCY_SECONDS: &str = "anywork_api_latency_seconds";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record metrics for a completed API request.
pub fn record_request(method: &str, status: u16, latency_ms: f64) {
    let status_str = status.to_string();

    counter!(
        names::REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status_str
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "method" => method.to_string()
    )
    .record(latency_ms / 1000.0);
}

// =============================================================================
// Tests
// =============================================================================

// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // INVOCATION METRICS
    // ============================================================================

    /// Handler invocations by returned status
    pub static ref INVOCATIONS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("invocations_total", "Total handler invocations"),
        &["status_code", "outcome"], // outcome: ok or RelayError::kind()
        REGISTRY
    ).unwrap();

    /// End-to-end handler duration
    pub static ref INVOCATION_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("invocation_duration_seconds", "Handler duration in seconds")
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["status_code"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // GEMINI API METRICS
    // ============================================================================

    /// Upstream generateContent calls
    pub static ref UPSTREAM_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("gemini_api_calls_total", "Total Gemini API calls"),
        &["model", "outcome"], // outcome: success, invalid_response, body_read_error, http_<status>, transport_error
        REGISTRY
    ).unwrap();

    /// Upstream call duration
    pub static ref UPSTREAM_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("gemini_api_duration_seconds", "Gemini API call duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["model"],
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        INVOCATIONS_TOTAL.with_label_values(&["200", "ok"]).inc();
        UPSTREAM_CALLS.with_label_values(&["test-model", "success"]).inc();

        let metrics = gather_metrics();
        assert!(metrics.contains("invocations_total"));
        assert!(metrics.contains("gemini_api_calls_total"));
    }
}

// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, INVOCATIONS_TOTAL, INVOCATION_DURATION, UPSTREAM_CALLS, UPSTREAM_DURATION,
};

/// Helper to record one handler invocation
pub fn record_invocation(status_code: u16, outcome: &str, duration_secs: f64) {
    let status = status_code.to_string();
    INVOCATIONS_TOTAL
        .with_label_values(&[&status, outcome])
        .inc();

    INVOCATION_DURATION
        .with_label_values(&[&status])
        .observe(duration_secs);
}

/// Helper to record one Gemini API call
pub fn record_upstream_call(model: &str, outcome: &str, duration_secs: f64) {
    UPSTREAM_CALLS.with_label_values(&[model, outcome]).inc();

    UPSTREAM_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

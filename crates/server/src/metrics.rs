use lazy_static::lazy_static;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

lazy_static! {
    pub static ref WORKFLOWS_STARTED: IntCounter = register_int_counter!(
        "codereview_workflows_started_total",
        "Total number of workflow executions started."
    )
    .unwrap();
    pub static ref WORKFLOWS_COMPLETED: IntCounter = register_int_counter!(
        "codereview_workflows_completed_total",
        "Total number of workflows that completed every step."
    )
    .unwrap();
    pub static ref WORKFLOWS_FAILED: IntCounter = register_int_counter!(
        "codereview_workflows_failed_total",
        "Total number of workflows that ended in failure, including cancellations."
    )
    .unwrap();
    pub static ref WORKFLOWS_ESCALATED: IntCounter = register_int_counter!(
        "codereview_workflows_escalated_total",
        "Total number of workflows handed off for human review."
    )
    .unwrap();
}

/// Render all registered metrics in the prometheus text format.
pub fn gather_metrics() -> String {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Failed to convert metrics to string")
}

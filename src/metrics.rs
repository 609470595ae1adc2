//! Prometheus metrics

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Setup Prometheus metrics exporter
/// Returns a handle that can be used to retrieve metrics
pub fn setup_metrics() -> Result<metrics_exporter_prometheus::PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    tracing::info!("Prometheus metrics exporter installed");

    Ok(handle)
}

/// Record drink creation
pub fn record_drink_created() {
    metrics::counter!("drinks_api_drinks_created_total").increment(1);
    metrics::gauge!("drinks_api_drinks_count").increment(1.0);
}

/// Record drink replacement
pub fn record_drink_updated() {
    metrics::counter!("drinks_api_drinks_updated_total").increment(1);
}

/// Record drink deletion
pub fn record_drink_deleted() {
    metrics::counter!("drinks_api_drinks_deleted_total").increment(1);
    metrics::gauge!("drinks_api_drinks_count").decrement(1.0);
}

/// Record a rejected payload
pub fn record_validation_failure(operation: &'static str) {
    metrics::counter!("drinks_api_validation_failures_total",
        "operation" => operation
    )
    .increment(1);
}

/// Set total drink count gauge
///
/// Called at startup and on every listing; creates and deletes adjust it in
/// between.
pub fn update_drink_count(count: usize) {
    metrics::gauge!("drinks_api_drinks_count").set(count as f64);
}

//! Prometheus recorder for the `metrics` counters emitted by the services.
//!
//! # Counters
//!
//! - `shorty_cache_lookups_total{outcome="hit"|"miss"}` - redirect cache lookups
//! - `shorty_clicks_flushed_total` - click counts written back to the durable store
//! - `shorty_links_created_total` - new short links

use anyhow::{Context, Result};
use metrics::{Unit, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Installs the process-wide Prometheus recorder and returns the handle that
/// renders it.
///
/// # Errors
///
/// Returns an error if a global recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    describe_counter!(
        "shorty_cache_lookups_total",
        Unit::Count,
        "Redirect lookups in the cache, by outcome"
    );
    describe_counter!(
        "shorty_clicks_flushed_total",
        Unit::Count,
        "Click counts written back to the durable store"
    );
    describe_counter!(
        "shorty_links_created_total",
        Unit::Count,
        "Short links created"
    );

    Ok(handle)
}

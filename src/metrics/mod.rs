// Metrics module - Prometheus metrics for the resize endpoint
//
// Each `Metrics` owns its own registry so tests and multiple server instances
// never collide on metric registration.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Outcome label for a finished request
pub const OUTCOME_REDIRECT: &str = "redirect";
pub const OUTCOME_ERROR: &str = "error";

pub struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
    errors: IntCounterVec,
    stage_duration: HistogramVec,
    stored_bytes: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new(
                "shrinkray_requests_total",
                "Total number of resize requests by outcome",
            ),
            &["outcome"], // redirect, error
        )
        .expect("valid requests_total definition");

        let errors = IntCounterVec::new(
            Opts::new(
                "shrinkray_errors_total",
                "Total number of failed resize requests by error kind",
            ),
            &["kind"],
        )
        .expect("valid errors_total definition");

        let stage_duration = HistogramVec::new(
            HistogramOpts::new(
                "shrinkray_stage_duration_seconds",
                "Duration of each pipeline stage in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
            &["stage"], // config, fetch, resize, store
        )
        .expect("valid stage_duration_seconds definition");

        let stored_bytes = IntCounter::new(
            "shrinkray_stored_bytes_total",
            "Total bytes of resized images written to storage",
        )
        .expect("valid stored_bytes_total definition");

        for collector in [
            Box::new(requests.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(errors.clone()),
            Box::new(stage_duration.clone()),
            Box::new(stored_bytes.clone()),
        ] {
            registry
                .register(collector)
                .expect("metric names are unique within a fresh registry");
        }

        Metrics {
            registry,
            requests,
            errors,
            stage_duration,
            stored_bytes,
        }
    }

    pub fn record_redirect(&self) {
        self.requests.with_label_values(&[OUTCOME_REDIRECT]).inc();
    }

    pub fn record_error(&self, kind: &str) {
        self.requests.with_label_values(&[OUTCOME_ERROR]).inc();
        self.errors.with_label_values(&[kind]).inc();
    }

    pub fn observe_stage(&self, stage: &str, elapsed: Duration) {
        self.stage_duration
            .with_label_values(&[stage])
            .observe(elapsed.as_secs_f64());
    }

    pub fn add_stored_bytes(&self, bytes: usize) {
        self.stored_bytes.inc_by(bytes as u64);
    }

    pub fn request_count(&self, outcome: &str) -> u64 {
        self.requests.with_label_values(&[outcome]).get()
    }

    pub fn error_count(&self, kind: &str) -> u64 {
        self.errors.with_label_values(&[kind]).get()
    }

    pub fn stored_bytes(&self) -> u64 {
        self.stored_bytes.get()
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn export_prometheus(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

//! Load outcome metrics using OpenTelemetry.

use crate::core::LoadOrigin;
use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Gauge, Meter};

/// Metrics collector for bootstrap property loading.
///
/// # Examples
///
/// ```rust,no_run
/// use catalina_properties::core::LoadOrigin;
/// use catalina_properties::metrics::LoadMetrics;
/// use opentelemetry::global;
///
/// let metrics = LoadMetrics::new(global::meter("catalina-properties"));
/// metrics.record_attempt();
/// metrics.record_outcome(&LoadOrigin::Bundled, 12);
/// ```
#[derive(Clone)]
pub struct LoadMetrics {
    load_attempts: Counter<u64>,
    load_outcomes: Counter<u64>,
    candidate_failures: Counter<u64>,
    properties_loaded: Gauge<u64>,
}

impl LoadMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let load_attempts = meter
            .u64_counter("catalina_properties.load.attempts")
            .with_description("Number of times the resolution chain ran")
            .build();

        let load_outcomes = meter
            .u64_counter("catalina_properties.load.outcome")
            .with_description("Completed loads, by the candidate that supplied the properties")
            .build();

        let candidate_failures = meter
            .u64_counter("catalina_properties.candidate.failures")
            .with_description("Candidates that could not be opened")
            .build();

        let properties_loaded = meter
            .u64_gauge("catalina_properties.properties.loaded")
            .with_description("Number of properties in the last completed load")
            .build();

        Self {
            load_attempts,
            load_outcomes,
            candidate_failures,
            properties_loaded,
        }
    }

    /// Record the start of a load.
    pub fn record_attempt(&self) {
        self.load_attempts.add(1, &[]);
    }

    /// Record a candidate that was skipped.
    pub fn record_candidate_failure(&self, candidate: &'static str) {
        self.candidate_failures
            .add(1, &[KeyValue::new("candidate", candidate)]);
    }

    /// Record a completed load.
    pub fn record_outcome(&self, origin: &LoadOrigin, count: usize) {
        self.load_outcomes
            .add(1, &[KeyValue::new("origin", origin.label())]);
        self.properties_loaded.record(count as u64, &[]);
    }
}

//! Prometheus Metrics Registry - MongoDB Probe Observability
//!
//! Holds the two probe instruments plus the process collector in a
//! dedicated registry. Built once in `main` and shared by `Arc` with
//! the periodic runner (writer) and the HTTP server (reader).

use std::time::Duration;

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};

pub use prometheus::TEXT_FORMAT;

/// Counter of successful store operations (ping or insert).
pub const OPERATIONS_TOTAL: &str = "mongodb_operations_total";

/// Latency histogram of successful store operations.
pub const OPERATION_DURATION_SECONDS: &str = "mongodb_operation_duration_seconds";

/// Centralized Prometheus metrics for the probe.
///
/// Instruments are atomics internally, so concurrent record/render
/// needs no extra locking.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Total successful operations.
    operations_total: IntCounter,
    /// Operation latency in seconds (default buckets).
    operation_duration: Histogram,
}

impl MetricsRegistry {
    /// Create and register all instruments.
    ///
    /// # Errors
    /// Fails if an instrument is invalid or registered twice.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let operations_total = IntCounter::with_opts(Opts::new(
            OPERATIONS_TOTAL,
            "Total number of MongoDB operations",
        ))?;

        let operation_duration = Histogram::with_opts(
            HistogramOpts::new(
                OPERATION_DURATION_SECONDS,
                "MongoDB operation latency in seconds",
            )
            .buckets(prometheus::DEFAULT_BUCKETS.to_vec()),
        )?;

        registry.register(Box::new(operations_total.clone()))?;
        registry.register(Box::new(operation_duration.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            operations_total,
            operation_duration,
        })
    }

    /// Record one successful operation: counter +1, latency observed.
    pub fn record_success(&self, elapsed: Duration) {
        self.operations_total.inc();
        self.operation_duration.observe(elapsed.as_secs_f64());
    }

    /// Current counter value.
    pub fn operations_total(&self) -> u64 {
        self.operations_total.get()
    }

    /// Number of latency observations so far.
    pub fn observation_count(&self) -> u64 {
        self.operation_duration.get_sample_count()
    }

    /// Sum of observed latencies in seconds.
    pub fn observation_sum(&self) -> f64 {
        self.operation_duration.get_sample_sum()
    }

    /// Render every registered instrument in the text exposition format.
    ///
    /// # Errors
    /// Fails if encoding fails or produces invalid UTF-8.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

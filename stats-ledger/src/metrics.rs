//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the ledger.
//!
//! # Metrics
//!
//! - `ledger_transactions_accepted_total` - Transactions appended
//! - `ledger_transactions_rejected_total` - Future-dated transactions rejected
//! - `ledger_transactions_dropped_total` - Stale transactions dropped
//! - `ledger_clears_total` - Ledger clears
//! - `ledger_statistics_requests_total` - Statistics reads served
//! - `ledger_access_denied_total` - Statistics reads denied by the gate
//! - `ledger_statistics_scan_seconds` - Histogram of aggregation scan latencies

use crate::types::Admission;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::sync::Arc;

/// Metrics collector
///
/// Each instance owns its registry, so several ledgers (or tests) never
/// collide on metric names.
#[derive(Clone)]
pub struct Metrics {
    /// Transactions appended
    pub accepted_total: IntCounter,

    /// Future-dated transactions rejected
    pub rejected_total: IntCounter,

    /// Stale transactions dropped
    pub dropped_total: IntCounter,

    /// Ledger clears
    pub clears_total: IntCounter,

    /// Statistics reads served
    pub statistics_total: IntCounter,

    /// Statistics reads denied
    pub access_denied_total: IntCounter,

    /// Aggregation scan duration histogram
    pub scan_duration: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let counter = |name: &str, help: &str| -> prometheus::Result<IntCounter> {
            let counter = IntCounter::new(name, help)?;
            registry.register(Box::new(counter.clone()))?;
            Ok(counter)
        };

        let accepted_total = counter(
            "ledger_transactions_accepted_total",
            "Total number of transactions appended",
        )?;
        let rejected_total = counter(
            "ledger_transactions_rejected_total",
            "Total number of future-dated transactions rejected",
        )?;
        let dropped_total = counter(
            "ledger_transactions_dropped_total",
            "Total number of stale transactions dropped",
        )?;
        let clears_total = counter("ledger_clears_total", "Total number of ledger clears")?;
        let statistics_total = counter(
            "ledger_statistics_requests_total",
            "Total number of statistics reads served",
        )?;
        let access_denied_total = counter(
            "ledger_access_denied_total",
            "Total number of statistics reads denied by location",
        )?;

        let scan_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_statistics_scan_seconds",
                "Histogram of statistics scan latencies",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.010, 0.050, 0.100, 0.500]),
        )?;
        registry.register(Box::new(scan_duration.clone()))?;

        Ok(Self {
            accepted_total,
            rejected_total,
            dropped_total,
            clears_total,
            statistics_total,
            access_denied_total,
            scan_duration,
            registry,
        })
    }

    /// Record the outcome of an ingestion
    pub fn record_admission(&self, admission: Admission) {
        match admission {
            Admission::Accepted => self.accepted_total.inc(),
            Admission::Future => self.rejected_total.inc(),
            Admission::Stale => self.dropped_total.inc(),
        }
    }

    /// Record ledger clear
    pub fn record_clear(&self) {
        self.clears_total.inc();
    }

    /// Record a served statistics read and its scan time
    pub fn record_statistics(&self, scan_seconds: f64) {
        self.statistics_total.inc();
        self.scan_duration.observe(scan_seconds);
    }

    /// Record a denied statistics read
    pub fn record_access_denied(&self) {
        self.access_denied_total.inc();
    }

    /// Render the registry in Prometheus text format
    pub fn render(&self) -> crate::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("accepted_total", &self.accepted_total.get())
            .field("rejected_total", &self.rejected_total.get())
            .field("dropped_total", &self.dropped_total.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.accepted_total.get(), 0);
        assert_eq!(metrics.clears_total.get(), 0);
    }

    #[test]
    fn test_independent_registries() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.record_clear();
        assert_eq!(a.clears_total.get(), 1);
        assert_eq!(b.clears_total.get(), 0);
    }

    #[test]
    fn test_record_admission() {
        let metrics = Metrics::new().unwrap();
        metrics.record_admission(Admission::Accepted);
        metrics.record_admission(Admission::Accepted);
        metrics.record_admission(Admission::Future);
        metrics.record_admission(Admission::Stale);

        assert_eq!(metrics.accepted_total.get(), 2);
        assert_eq!(metrics.rejected_total.get(), 1);
        assert_eq!(metrics.dropped_total.get(), 1);
    }

    #[test]
    fn test_render() {
        let metrics = Metrics::new().unwrap();
        metrics.record_statistics(0.0002);
        metrics.record_access_denied();

        let output = metrics.render().unwrap();
        assert!(output.contains("ledger_statistics_requests_total 1"));
        assert!(output.contains("ledger_access_denied_total 1"));
        assert!(output.contains("ledger_statistics_scan_seconds_bucket"));
    }
}

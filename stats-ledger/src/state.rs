//! Application context shared by every request
//!
//! # Lock discipline
//!
//! [`Ledger`] and [`AccessGate`] each own exactly one mutex. A statistics read
//! takes the gate lock, releases it, and only then takes the ledger lock, so
//! the two are never held together.

use crate::{
    gate::AccessGate,
    ledger::Ledger,
    metrics::Metrics,
    types::{Admission, Statistics, Transaction},
    Config, Error, Result,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Process-wide state, built once and handed to handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub gate: Arc<AccessGate>,
    pub metrics: Metrics,
}

impl AppState {
    /// Build empty state with an open gate
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            ledger: Arc::new(Ledger::with_window_seconds(config.ledger.window_seconds)),
            gate: Arc::new(AccessGate::new()),
            metrics: Metrics::new()?,
        })
    }

    /// Admit and store a transaction, recording the outcome
    pub fn submit_transaction(&self, tx: Transaction, now: DateTime<Utc>) -> Admission {
        let admission = self.ledger.ingest(tx, now);
        self.metrics.record_admission(admission);
        if admission == Admission::Future {
            warn!(timestamp = %tx.timestamp, now = %now, "Rejected future-dated transaction");
        }
        admission
    }

    /// Empty the ledger
    pub fn clear_transactions(&self) {
        self.ledger.clear();
        self.metrics.record_clear();
        info!("Ledger cleared");
    }

    /// Statistics for a caller claiming `claimed_city` (raw bytes or text)
    pub fn statistics_for(
        &self,
        claimed_city: impl AsRef<[u8]>,
        now: DateTime<Utc>,
    ) -> Result<Statistics> {
        // Gate lock is released inside check_access, before the scan below
        if !self.gate.check_access(claimed_city).is_allowed() {
            self.metrics.record_access_denied();
            warn!("Statistics request denied by location gate");
            return Err(Error::AccessDenied);
        }

        let started = Instant::now();
        let stats = self.ledger.compute_statistics(now);
        self.metrics
            .record_statistics(started.elapsed().as_secs_f64());
        Ok(stats)
    }
}

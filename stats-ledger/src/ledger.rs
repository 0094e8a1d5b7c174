//! In-memory transaction ledger with trailing-window statistics
//!
//! The ledger is an append-only sequence of [`Transaction`]s, emptied only by
//! [`Ledger::clear`]. Statistics are computed by a full scan on every read.
//!
//! # Invariants
//!
//! - Admission: only timestamps in `(now - window, now]` are ever appended
//! - Append-only: nothing is removed except by a whole-sequence clear
//! - Snapshot reads: a scan holds the lock for its whole duration, so it is
//!   linearizable with respect to `append` and `clear`
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use stats_ledger::{Admission, Ledger, Transaction};
//!
//! let ledger = Ledger::default();
//! let now = Utc::now();
//!
//! assert_eq!(ledger.ingest(Transaction::new(12.3, now), now), Admission::Accepted);
//!
//! let stats = ledger.compute_statistics(now);
//! assert_eq!(stats.count, 1);
//! assert_eq!(stats.sum, 12.3);
//! ```

use crate::types::{Admission, Statistics, Transaction};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::debug;

/// Default trailing window (seconds)
pub const DEFAULT_WINDOW_SECONDS: i64 = 60;

/// Decide whether a transaction stamped `timestamp` may enter the ledger at `now`
///
/// Both window edges are inclusive: `now` itself and exactly `now - window`
/// are accepted.
pub fn admit(timestamp: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> Admission {
    if timestamp > now {
        Admission::Future
    } else if now - timestamp > window {
        Admission::Stale
    } else {
        Admission::Accepted
    }
}

/// Shared transaction log
#[derive(Debug)]
pub struct Ledger {
    /// Transactions in insertion order
    entries: Mutex<Vec<Transaction>>,

    /// Trailing window used for admission and aggregation
    window: Duration,
}

impl Ledger {
    /// Create empty ledger with the given trailing window
    pub fn new(window: Duration) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            window,
        }
    }

    /// Create empty ledger with a window of `seconds`
    pub fn with_window_seconds(seconds: i64) -> Self {
        Self::new(Duration::seconds(seconds))
    }

    /// Trailing window length
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Append a transaction unconditionally
    ///
    /// Callers are expected to have run [`admit`] first; use
    /// [`Ledger::ingest`] to do both.
    pub fn append(&self, tx: Transaction) {
        self.entries.lock().push(tx);
    }

    /// Run the ingestion policy and append on acceptance
    pub fn ingest(&self, tx: Transaction, now: DateTime<Utc>) -> Admission {
        let admission = admit(tx.timestamp, now, self.window);
        if admission == Admission::Accepted {
            self.append(tx);
        }
        debug!(
            amount = tx.amount,
            timestamp = %tx.timestamp,
            outcome = admission.as_str(),
            "Transaction ingested"
        );
        admission
    }

    /// Drop every transaction
    pub fn clear(&self) {
        *self.entries.lock() = Vec::new();
    }

    /// Number of stored transactions (in or out of the window)
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Aggregate every transaction with `now - timestamp <= window`
    ///
    /// An empty window yields [`Statistics::default`] (all zeros). Amounts
    /// are finite on decode, but their sum may still overflow to infinity.
    pub fn compute_statistics(&self, now: DateTime<Utc>) -> Statistics {
        let mut stats = Statistics::default();

        let entries = self.entries.lock();
        for tx in entries.iter().filter(|tx| now - tx.timestamp <= self.window) {
            stats.sum += tx.amount;
            if stats.count == 0 {
                stats.max = tx.amount;
                stats.min = tx.amount;
            } else {
                stats.max = stats.max.max(tx.amount);
                stats.min = stats.min.min(tx.amount);
            }
            stats.count += 1;
        }
        drop(entries);

        if stats.count > 0 {
            stats.average = stats.sum / stats.count as f64;
        }
        stats
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::with_window_seconds(DEFAULT_WINDOW_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn window() -> Duration {
        Duration::seconds(DEFAULT_WINDOW_SECONDS)
    }

    #[test]
    fn test_admit_boundaries() {
        let now = fixed_now();
        assert_eq!(admit(now, now, window()), Admission::Accepted);
        assert_eq!(
            admit(now + Duration::nanoseconds(1), now, window()),
            Admission::Future
        );
        assert_eq!(
            admit(now - Duration::seconds(60), now, window()),
            Admission::Accepted
        );
        assert_eq!(
            admit(now - Duration::seconds(60) - Duration::nanoseconds(1), now, window()),
            Admission::Stale
        );
    }

    #[test]
    fn test_ingest_future_leaves_ledger_unchanged() {
        let ledger = Ledger::default();
        let now = fixed_now();

        let outcome = ledger.ingest(Transaction::new(12.3, now + Duration::seconds(60)), now);
        assert_eq!(outcome, Admission::Future);
        assert!(ledger.is_empty());
        assert_eq!(ledger.compute_statistics(now).count, 0);
    }

    #[test]
    fn test_ingest_stale_is_dropped() {
        let ledger = Ledger::default();
        let now = fixed_now();

        let outcome = ledger.ingest(Transaction::new(12.3, now - Duration::seconds(61)), now);
        assert_eq!(outcome, Admission::Stale);
        assert!(ledger.is_empty());
        assert_eq!(ledger.compute_statistics(now).count, 0);
    }

    #[test]
    fn test_single_transaction_statistics() {
        let ledger = Ledger::default();
        let now = fixed_now();

        assert_eq!(ledger.ingest(Transaction::new(12.3, now), now), Admission::Accepted);

        let stats = ledger.compute_statistics(now);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.sum, 12.3);
        assert_eq!(stats.max, 12.3);
        assert_eq!(stats.min, 12.3);
        assert_eq!(stats.average, 12.3);
    }

    #[test]
    fn test_empty_ledger_is_all_zero() {
        let ledger = Ledger::default();
        assert_eq!(ledger.compute_statistics(fixed_now()), Statistics::default());
    }

    #[test]
    fn test_aggregates_over_window() {
        let ledger = Ledger::default();
        let now = fixed_now();

        for (amount, age) in [(10.0, 5), (-4.0, 30), (30.0, 59)] {
            ledger.append(Transaction::new(amount, now - Duration::seconds(age)));
        }

        let stats = ledger.compute_statistics(now);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.sum, 36.0);
        assert_eq!(stats.average, 12.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.min, -4.0);
    }

    #[test]
    fn test_entries_age_out_of_window() {
        let ledger = Ledger::default();
        let now = fixed_now();

        ledger.append(Transaction::new(1.0, now - Duration::seconds(50)));
        ledger.append(Transaction::new(2.0, now));

        // Inclusive edge: exactly 60s old still counts
        let stats = ledger.compute_statistics(now + Duration::seconds(10));
        assert_eq!(stats.count, 2);

        let stats = ledger.compute_statistics(now + Duration::seconds(11));
        assert_eq!(stats.count, 1);
        assert_eq!(stats.sum, 2.0);

        // Aged-out entries are still stored until cleared
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_all_negative_window_reports_real_max() {
        let ledger = Ledger::default();
        let now = fixed_now();

        ledger.append(Transaction::new(-3.0, now));
        ledger.append(Transaction::new(-7.0, now));

        let stats = ledger.compute_statistics(now);
        assert_eq!(stats.max, -3.0);
        assert_eq!(stats.min, -7.0);
        assert_eq!(stats.average, -5.0);
    }

    #[test]
    fn test_sum_overflow_saturates() {
        let ledger = Ledger::default();
        let now = fixed_now();

        ledger.append(Transaction::new(f64::MAX, now));
        ledger.append(Transaction::new(f64::MAX, now));

        let stats = ledger.compute_statistics(now);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.sum, f64::INFINITY);
        assert_eq!(stats.max, f64::MAX);
        assert_eq!(stats.min, f64::MAX);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let ledger = Ledger::default();
        let now = fixed_now();
        ledger.append(Transaction::new(1.0, now));

        ledger.clear();
        assert!(ledger.is_empty());
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.compute_statistics(now), Statistics::default());
    }

    #[test]
    fn test_custom_window() {
        let ledger = Ledger::with_window_seconds(10);
        let now = fixed_now();

        assert_eq!(
            ledger.ingest(Transaction::new(1.0, now - Duration::seconds(11)), now),
            Admission::Stale
        );
        assert_eq!(
            ledger.ingest(Transaction::new(1.0, now - Duration::seconds(10)), now),
            Admission::Accepted
        );
        assert_eq!(ledger.window(), Duration::seconds(10));
    }
}

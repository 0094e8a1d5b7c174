//! Core types for the statistics ledger
//!
//! Wire shapes are kept exactly as clients send and expect them:
//! - Amounts are plain JSON numbers (`f64`), no currency attached
//! - Timestamps are RFC 3339 strings, normalized to UTC on decode
//! - Missing fields decode to zero values; a missing timestamp is the Unix
//!   epoch, which the ingestion policy drops as stale

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped monetary transaction
///
/// Transactions are anonymous: they carry no identifier and are never
/// looked up individually, only aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Signed amount
    #[serde(default)]
    pub amount: f64,

    /// Point in time the transaction happened, as supplied by the client
    #[serde(default = "unset_timestamp")]
    pub timestamp: DateTime<Utc>,
}

fn unset_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Transaction {
    /// Create new transaction
    pub fn new(amount: f64, timestamp: DateTime<Utc>) -> Self {
        Self { amount, timestamp }
    }
}

/// Aggregate over the transactions inside the trailing window
///
/// Computed fresh on every read, never stored. Sums follow IEEE 754: amounts
/// whose total exceeds `f64::MAX` saturate to infinity, which JSON encodes as
/// `null` for `sum` and `avg`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Sum of amounts
    pub sum: f64,

    /// `sum / count`, or 0 when nothing is in the window
    #[serde(rename = "avg")]
    pub average: f64,

    /// Largest amount, or 0 when nothing is in the window
    pub max: f64,

    /// Smallest amount, or 0 when nothing is in the window
    pub min: f64,

    /// Number of transactions in the window
    pub count: u64,
}

/// Authorized location claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// City name, stored verbatim (case-sensitive, may be empty)
    #[serde(default)]
    pub city: String,
}

/// Outcome of running a proposed transaction through the ingestion policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Inside the window, appended to the ledger
    Accepted,

    /// Timestamp is after `now`; rejected
    Future,

    /// Older than the window; dropped without being stored
    Stale,
}

impl Admission {
    /// Label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Admission::Accepted => "accepted",
            Admission::Future => "future",
            Admission::Stale => "stale",
        }
    }
}

/// Verdict of the access gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Gate is open, or the claimed city matches
    Allowed,

    /// Gate is set and the claimed city does not match
    Denied,
}

impl Access {
    /// True if access is allowed
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }
}

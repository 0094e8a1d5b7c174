//! Statistics Ledger
//!
//! In-memory transaction ledger with trailing-window statistics and a
//! location-based access gate, served over HTTP.
//!
//! # Architecture
//!
//! - **Ledger**: append-only transaction log behind a single mutex
//! - **Access Gate**: one optional authorized city behind its own mutex
//! - **AppState**: owns both and is injected into every request
//!
//! # Invariants
//!
//! - Admission: future timestamps are rejected, stale ones dropped
//! - Window: statistics cover `now - timestamp <= window`, inclusive
//! - No nesting: the gate lock is released before the ledger lock is taken

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod ledger;
pub mod metrics;
pub mod state;
pub mod types;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use gate::AccessGate;
pub use ledger::{admit, Ledger};
pub use metrics::Metrics;
pub use state::AppState;
pub use types::{Access, Admission, Location, Statistics, Transaction};

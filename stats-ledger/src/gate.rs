//! Location-based access gate for statistics reads

use crate::types::Access;
use parking_lot::Mutex;
use tracing::info;

/// Single optional authorized city
///
/// Unset means open access. Setting replaces the previous city wholesale.
#[derive(Debug, Default)]
pub struct AccessGate {
    city: Mutex<Option<String>>,
}

impl AccessGate {
    /// Create an unset (open) gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Authorize `city`, replacing any previous value
    ///
    /// Stored verbatim; the empty string is a valid city, distinct from unset.
    pub fn set_location(&self, city: impl Into<String>) {
        let city = city.into();
        info!(city = %city, "Authorized location set");
        *self.city.lock() = Some(city);
    }

    /// Reopen access for every caller
    pub fn reset_location(&self) {
        *self.city.lock() = None;
        info!("Authorized location reset");
    }

    /// Currently authorized city, if any
    pub fn current(&self) -> Option<String> {
        self.city.lock().clone()
    }

    /// Byte-exact comparison of `claimed` against the authorized city
    ///
    /// Raw header bytes are accepted as-is; they need not be valid UTF-8.
    pub fn check_access(&self, claimed: impl AsRef<[u8]>) -> Access {
        match self.city.lock().as_deref() {
            None => Access::Allowed,
            Some(city) if city.as_bytes() == claimed.as_ref() => Access::Allowed,
            Some(_) => Access::Denied,
        }
    }
}

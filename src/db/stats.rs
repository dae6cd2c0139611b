//! Store round-trip accounting
//!
//! Every statement a repository sends to the database is recorded here, so
//! the number of round-trips a page costs can be logged and asserted on.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counter of statements issued against one pool
#[derive(Debug, Default)]
pub struct RoundTripCounter {
    total: AtomicU64,
}

impl RoundTripCounter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
        }
    }

    /// Record one round-trip
    pub fn record(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Total round-trips recorded since the pool was created
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

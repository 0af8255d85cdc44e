//! In-memory live-key counter.

use std::sync::atomic::{AtomicI64, Ordering};

/// An approximate, lock-free counter of live keys in one partition.
///
/// The counter is reconciled against the engine exactly once, by the full
/// scan at store construction. Afterwards it is bumped on every successful
/// mutation without checking whether the key already existed, so overwrites
/// inflate it and removes of absent keys deflate it (it can go below the
/// true population, even negative). Callers that need an exact population
/// must scan.
pub struct CountTracker {
    count: AtomicI64,
}

impl CountTracker {
    /// Creates a tracker seeded with the given count.
    pub fn new(initial: i64) -> Self {
        Self {
            count: AtomicI64::new(initial),
        }
    }

    /// Returns the current cached count.
    pub fn count(&self) -> i64 {
        self.count.load(Ordering::SeqCst)
    }

    /// Adds one to the cached count.
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Subtracts one from the cached count.
    pub fn decrement(&self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}

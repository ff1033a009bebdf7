//! Asset id allocation.

use crate::models::AssetId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic id counter shared by every writer of one population run.
///
/// Each call to [`next`](Self::next) is a single atomic increment, so two
/// concurrent callers can never observe the same id.
#[derive(Debug, Default)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    /// Creates a sequence whose first id is 0.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a sequence whose first id is `first`.
    pub fn starting_at(first: AssetId) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Allocates the next id.
    pub fn next(&self) -> AssetId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The id the next call to [`next`](Self::next) will return.
    pub fn peek(&self) -> AssetId {
        self.next.load(Ordering::Relaxed)
    }
}

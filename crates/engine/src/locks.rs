//! Per-lottery serialization.
//!
//! Joining and the subsequent fullness check + draw trigger must be
//! serialized per lottery: without this, two requests racing for the last
//! slots could both observe a pre-fill count and both fire the draw. Locks
//! are created on demand and keyed by lottery id; operations on different
//! lotteries never contend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tombola_types::LotteryId;

/// Registry of per-lottery async mutexes.
#[derive(Debug, Default)]
pub struct LotteryLocks {
    locks: DashMap<LotteryId, Arc<Mutex<()>>>,
}

impl LotteryLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one lottery, creating it on first use.
    ///
    /// The guard is owned, so it can be held across await points for the
    /// whole join-then-maybe-draw sequence.
    pub async fn acquire(&self, id: LotteryId) -> OwnedMutexGuard<()> {
        // The DashMap entry guard is dropped at the end of this statement,
        // before the await; holding it across the lock would deadlock the
        // shard.
        let cell = self.locks.entry(id).or_default().clone();
        cell.lock_owned().await
    }

    /// Number of lotteries with a registered lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no lock has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

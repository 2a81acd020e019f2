//! Cached lottery listing.
//!
//! `GET /lotteries` assembles every lottery with nested participants and
//! users; the result only changes on mutation, so the assembled snapshot is
//! kept behind an [`arc_swap::ArcSwapOption`] and dropped whenever a
//! mutation lands or the revalidation hook fires. Readers either take the
//! current snapshot lock-free or rebuild it from the store.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tombola_types::LotteryView;

/// Lock-free snapshot cache for the lottery listing.
#[derive(Debug, Default)]
pub struct ListingCache {
    snapshot: ArcSwapOption<Vec<LotteryView>>,
}

impl ListingCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot, if one is cached.
    #[must_use]
    pub fn get(&self) -> Option<Arc<Vec<LotteryView>>> {
        self.snapshot.load_full()
    }

    /// Stores a freshly assembled snapshot and returns it.
    pub fn put(&self, views: Vec<LotteryView>) -> Arc<Vec<LotteryView>> {
        let shared = Arc::new(views);
        self.snapshot.store(Some(shared.clone()));
        shared
    }

    /// Drops the snapshot; the next read rebuilds from the store.
    pub fn invalidate(&self) {
        self.snapshot.store(None);
    }
}

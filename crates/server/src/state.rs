//! Shared application state.

use std::sync::Arc;

use tombola_engine::Engine;
use tombola_store::Store;

use crate::catalog::ProductCatalog;
use crate::listing_cache::ListingCache;

/// Handle passed to every request handler.
pub type SharedState = Arc<AppState>;

/// Central application state: the engine (which owns the store), the
/// lottery listing cache, and the product catalog seam.
///
/// There is no ambient per-user state; the acting user travels explicitly
/// in each request body.
pub struct AppState {
    /// Join orchestrator and draw runner.
    pub engine: Engine,
    /// Cached `GET /lotteries` snapshot, dropped on every mutation.
    pub listing: ListingCache,
    /// External product catalog.
    pub catalog: Arc<dyn ProductCatalog>,
}

impl AppState {
    /// Builds the shared state for a store and catalog.
    pub fn new(store: Arc<Store>, catalog: Arc<dyn ProductCatalog>) -> SharedState {
        Arc::new(Self { engine: Engine::new(store), listing: ListingCache::new(), catalog })
    }

    /// The store behind the engine.
    #[must_use]
    pub fn store(&self) -> &Arc<Store> {
        self.engine.store()
    }
}

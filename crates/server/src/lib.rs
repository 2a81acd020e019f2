//! HTTP server for the Tombola lottery service.
//!
//! Exposes the lottery surface over JSON: listing with nested participants,
//! admin lottery creation, joining, winner selection, the listing-cache
//! revalidation hook, login, and the product catalog proxy.

pub mod catalog;
pub mod config;
pub mod listing_cache;
pub mod routes;
pub mod seed;
pub mod shutdown;
pub mod state;

pub use routes::app;
pub use state::{AppState, SharedState};

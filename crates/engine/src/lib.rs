//! Lottery lifecycle and winner selection engine.
//!
//! Owns the rules that govern when a lottery accepts a join, how fullness
//! is decided, and how a winner set is committed:
//!
//! - [`lifecycle`]: the `active → completed` state machine guards
//! - [`draw`]: uniform random winner selection
//! - [`Engine`]: the join orchestrator and draw runner, serialized per
//!   lottery so overlapping requests can neither over-fill a lottery nor
//!   double-fire a draw

pub mod draw;
pub mod lifecycle;
mod locks;
mod orchestrator;

pub use locks::LotteryLocks;
pub use orchestrator::{DrawOutcome, Engine, JoinReceipt};

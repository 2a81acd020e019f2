//! Store gateway for the Tombola lottery service.
//!
//! The sole interface to persisted entities (users, lotteries,
//! participation records), backed by an embedded [`redb`] database with
//! postcard value encoding.
//!
//! redb admits a single write transaction at a time, so every mutating
//! gateway operation is an atomic read-modify-write: the participant insert
//! re-reads the authoritative count and the duplicate-join index inside the
//! same transaction that writes the row, and the draw commit applies all
//! winner flags plus the status flip as one unit.

mod codec;
mod gateway;
mod keys;
mod tables;

pub use gateway::{JoinInsert, SeedUser, Store};

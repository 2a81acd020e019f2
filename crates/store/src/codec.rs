//! Postcard value encoding for stored rows.

use serde::{de::DeserializeOwned, Serialize};
use tombola_types::{Result, TombolaError};

/// Encodes a row for storage.
///
/// # Errors
///
/// Returns [`TombolaError::Serialization`] on codec failure.
#[track_caller]
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let loc = std::panic::Location::caller();
    postcard::to_allocvec(value).map_err(|e| TombolaError::Serialization {
        message: e.to_string(),
        location: snafu::Location::new(loc.file(), loc.line(), loc.column()),
    })
}

/// Decodes a stored row.
///
/// # Errors
///
/// Returns [`TombolaError::Serialization`] on codec failure, which here
/// indicates corruption or a codec change without migration.
#[track_caller]
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let loc = std::panic::Location::caller();
    postcard::from_bytes(bytes).map_err(|e| TombolaError::Serialization {
        message: e.to_string(),
        location: snafu::Location::new(loc.file(), loc.line(), loc.column()),
    })
}

/// Maps an underlying storage failure into [`TombolaError::Store`],
/// preserving the caller's source location.
#[track_caller]
pub fn store_error(err: impl std::fmt::Display) -> TombolaError {
    let loc = std::panic::Location::caller();
    TombolaError::Store {
        message: err.to_string(),
        location: snafu::Location::new(loc.file(), loc.line(), loc.column()),
    }
}

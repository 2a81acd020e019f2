//! Identifier newtypes.
//!
//! Every persisted entity is keyed by a 64-bit Snowflake-style identifier
//! (see [`crate::snowflake`]). The newtypes below keep the three ID spaces
//! from being mixed up at compile time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u64` for type-safe identifiers.
///
/// Each generated type provides:
/// - Standard derives: Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord
/// - Serde with `#[serde(transparent)]` for wire format compatibility
/// - `From<u64>` and `Into<u64>` conversions
/// - `Display` with a semantic prefix (e.g., `lottery:123`)
/// - `new()` constructor and `value()` accessor
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:expr
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw value.
            #[inline]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the raw numeric value.
            #[inline]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", $prefix, self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                s.parse::<u64>().map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user.
    ///
    /// # Display
    ///
    /// Formats with `user:` prefix: `user:42`.
    UserId, "user"
);

define_id!(
    /// Unique identifier for a lottery.
    ///
    /// # Display
    ///
    /// Formats with `lottery:` prefix: `lottery:7`.
    LotteryId, "lottery"
);

define_id!(
    /// Unique identifier for a participation record.
    ///
    /// # Display
    ///
    /// Formats with `participant:` prefix: `participant:9`.
    ParticipantId, "participant"
);

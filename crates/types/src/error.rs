//! Error types for the Tombola service using snafu.
//!
//! Defines a unified error type that captures:
//! - Store errors (redb, codec, I/O)
//! - Lifecycle conflicts (full, already joined, already completed)
//! - Request errors (validation, not-found, credentials)
//!
//! Each error variant maps to an [`ErrorCode`] with a unique numeric
//! identifier, a retryability classification, and the HTTP status the
//! request boundary should answer with.

use core::fmt;

use snafu::{Location, Snafu};

use crate::ids::{LotteryId, UserId};

/// Unified result type for lottery operations.
pub type Result<T, E = TombolaError> = std::result::Result<T, E>;

/// Machine-readable error codes for programmatic error handling.
///
/// Each [`TombolaError`] variant maps to a unique numeric code. Codes are
/// organized into ranges:
///
/// | Range       | Domain     | Examples                                   |
/// |-------------|------------|--------------------------------------------|
/// | 1000–1099   | Store      | Persistence failure, codec, I/O            |
/// | 1100–1199   | Store      | Partial draw commit                        |
/// | 2000–2099   | Lifecycle  | Not active, full, completed, duplicate     |
/// | 3000–3099   | Request    | Validation, credentials                    |
/// | 3100–3199   | Request    | Lottery/user not found                     |
/// | 3200–3299   | Internal   | Configuration, invariant violations        |
///
/// Codes are transmitted as the `code` field of JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // --- Store errors (1000–1199) ---
    /// Underlying persistence failure.
    Store = 1000,
    /// Value encode/decode failure.
    Serialization = 1001,
    /// Filesystem I/O failure.
    Io = 1002,
    /// Winner writes could not be committed as one unit.
    PartialCommit = 1100,

    // --- Lifecycle errors (2000–2099) ---
    /// Lottery is not accepting joins.
    LotteryNotActive = 2000,
    /// Lottery has reached its capacity.
    LotteryFull = 2001,
    /// Lottery already completed; no re-draws.
    AlreadyCompleted = 2002,
    /// User already holds a participation record for this lottery.
    AlreadyJoined = 2003,
    /// Draw requested on a lottery with no participants.
    NoParticipants = 2004,

    // --- Request errors (3000–3199) ---
    /// Missing or malformed input field.
    Validation = 3000,
    /// Username/password pair did not match.
    InvalidCredentials = 3001,
    /// Lottery not found.
    LotteryNotFound = 3100,
    /// User not found.
    UserNotFound = 3101,

    // --- Internal errors (3200–3299) ---
    /// Configuration error.
    Config = 3200,
    /// Unexpected state or invariant violation.
    Internal = 3201,
}

impl ErrorCode {
    /// Returns the numeric code value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Converts a numeric code to an `ErrorCode`, returning `None` for
    /// unknown values.
    #[must_use]
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            1000 => Some(Self::Store),
            1001 => Some(Self::Serialization),
            1002 => Some(Self::Io),
            1100 => Some(Self::PartialCommit),
            2000 => Some(Self::LotteryNotActive),
            2001 => Some(Self::LotteryFull),
            2002 => Some(Self::AlreadyCompleted),
            2003 => Some(Self::AlreadyJoined),
            2004 => Some(Self::NoParticipants),
            3000 => Some(Self::Validation),
            3001 => Some(Self::InvalidCredentials),
            3100 => Some(Self::LotteryNotFound),
            3101 => Some(Self::UserNotFound),
            3200 => Some(Self::Config),
            3201 => Some(Self::Internal),
            _ => None,
        }
    }

    /// Whether this error is retryable.
    ///
    /// Retryable errors may succeed on a subsequent attempt. A failed draw
    /// commit is the notable member: the draw is idempotent per lottery, so
    /// an operator can re-run selection after a `PartialCommit` or `Store`
    /// failure.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Store | Self::Io | Self::PartialCommit)
    }

    /// HTTP status code the request boundary answers with.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Validation | Self::NoParticipants => 400,
            Self::InvalidCredentials => 401,
            Self::LotteryNotFound | Self::UserNotFound => 404,
            Self::LotteryNotActive
            | Self::LotteryFull
            | Self::AlreadyCompleted
            | Self::AlreadyJoined => 409,
            Self::Store
            | Self::Serialization
            | Self::Io
            | Self::PartialCommit
            | Self::Config
            | Self::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Top-level error type for lottery operations.
///
/// # Recovery Guide
///
/// | Variant              | Retryable | Recovery Action                                      |
/// | -------------------- | --------- | ---------------------------------------------------- |
/// | `Store`              | Yes       | Check disk space and I/O health, then retry          |
/// | `Serialization`      | No        | Codec bug or corruption; report as issue             |
/// | `Io`                 | Yes       | Check filesystem permissions and disk health         |
/// | `PartialCommit`      | Yes       | Status was NOT flipped; re-run winner selection      |
/// | `LotteryNotActive`   | No        | Lottery is closed; nothing to do                     |
/// | `LotteryFull`        | No        | Capacity reached; join a different lottery           |
/// | `AlreadyCompleted`   | No        | Winners are final; no re-draws                       |
/// | `AlreadyJoined`      | No        | The earlier join stands                              |
/// | `NoParticipants`     | No        | Wait for at least one join before drawing            |
/// | `Validation`         | No        | Fix the request field and resubmit                   |
/// | `InvalidCredentials` | No        | Fix the username/password pair                       |
/// | `LotteryNotFound`    | No        | Verify the lottery id                                |
/// | `UserNotFound`       | No        | Verify the user id                                   |
/// | `Config`             | No        | Fix the configuration value and restart              |
/// | `Internal`           | No        | Unexpected state; report as issue with context       |
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TombolaError {
    /// Store layer error (redb transaction, table operation, backend failure).
    #[snafu(display("store error at {location}: {message}"))]
    Store {
        /// Error description.
        message: String,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// Value encode/decode failure (postcard codec).
    #[snafu(display("serialization error at {location}: {message}"))]
    Serialization {
        /// Error description.
        message: String,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// Filesystem I/O error.
    #[snafu(display("I/O error at {location}: {source}"))]
    Io {
        /// Underlying I/O error.
        source: std::io::Error,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// Winner writes could not be committed as a single unit.
    ///
    /// The lottery status was NOT flipped; selection can be re-run safely
    /// because the draw is idempotent per lottery.
    #[snafu(display(
        "draw commit failed for {lottery_id}: {written} of {requested} winner writes applied, \
         transaction aborted"
    ))]
    PartialCommit {
        /// The lottery whose draw failed.
        lottery_id: LotteryId,
        /// Winner writes staged before the failure.
        written: usize,
        /// Winner writes requested.
        requested: usize,
    },

    /// Lottery is not accepting joins.
    #[snafu(display("{lottery_id} is not active"))]
    LotteryNotActive {
        /// The lottery.
        lottery_id: LotteryId,
    },

    /// Lottery has reached its capacity.
    #[snafu(display("{lottery_id} is full ({max_participants} participants)"))]
    LotteryFull {
        /// The lottery.
        lottery_id: LotteryId,
        /// Its capacity.
        max_participants: u32,
    },

    /// Lottery already completed; winners are final.
    #[snafu(display("{lottery_id} is already completed"))]
    AlreadyCompleted {
        /// The lottery.
        lottery_id: LotteryId,
    },

    /// User already joined this lottery.
    #[snafu(display("{user_id} already joined {lottery_id}"))]
    AlreadyJoined {
        /// The lottery.
        lottery_id: LotteryId,
        /// The user.
        user_id: UserId,
    },

    /// Draw requested on a lottery with no participants.
    #[snafu(display("{lottery_id} has no participants"))]
    NoParticipants {
        /// The lottery.
        lottery_id: LotteryId,
    },

    /// Missing or malformed input field.
    #[snafu(display("invalid {field}: {constraint}"))]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Description of the violated constraint.
        constraint: String,
    },

    /// Username/password pair did not match a seeded account.
    #[snafu(display("invalid username or password"))]
    InvalidCredentials,

    /// Lottery not found.
    #[snafu(display("{lottery_id} not found"))]
    LotteryNotFound {
        /// The missing lottery.
        lottery_id: LotteryId,
    },

    /// User not found.
    #[snafu(display("{user_id} not found"))]
    UserNotFound {
        /// The missing user.
        user_id: UserId,
    },

    /// Configuration error (invalid value or constraint violation).
    #[snafu(display("configuration error: {message}"))]
    Config {
        /// Error description.
        message: String,
    },

    /// Internal error (unexpected state, invariant violation).
    #[snafu(display("internal error at {location}: {message}"))]
    Internal {
        /// Error description.
        message: String,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },
}

impl TombolaError {
    /// Returns the machine-readable error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Store { .. } => ErrorCode::Store,
            Self::Serialization { .. } => ErrorCode::Serialization,
            Self::Io { .. } => ErrorCode::Io,
            Self::PartialCommit { .. } => ErrorCode::PartialCommit,
            Self::LotteryNotActive { .. } => ErrorCode::LotteryNotActive,
            Self::LotteryFull { .. } => ErrorCode::LotteryFull,
            Self::AlreadyCompleted { .. } => ErrorCode::AlreadyCompleted,
            Self::AlreadyJoined { .. } => ErrorCode::AlreadyJoined,
            Self::NoParticipants { .. } => ErrorCode::NoParticipants,
            Self::Validation { .. } => ErrorCode::Validation,
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
            Self::LotteryNotFound { .. } => ErrorCode::LotteryNotFound,
            Self::UserNotFound { .. } => ErrorCode::UserNotFound,
            Self::Config { .. } => ErrorCode::Config,
            Self::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Whether this error is retryable. Delegates to
    /// [`ErrorCode::is_retryable`] for consistency with the wire format.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }

    /// HTTP status the request boundary answers with. Delegates to
    /// [`ErrorCode::http_status`].
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code().http_status()
    }
}

//! Core type definitions for the Tombola lottery service.
//!
//! Shared by every other crate in the workspace:
//! - Identifier newtypes ([`UserId`], [`LotteryId`], [`ParticipantId`])
//! - The domain model ([`User`], [`Lottery`], [`Participant`])
//! - The unified error taxonomy ([`TombolaError`], [`ErrorCode`])
//! - Input validation for request fields

pub mod error;
pub mod ids;
pub mod model;
pub mod snowflake;
pub mod validation;

pub use error::{ErrorCode, Result, TombolaError};
pub use ids::{LotteryId, ParticipantId, UserId};
pub use model::{
    Lottery, LotteryStatus, LotteryView, NewLottery, Participant, ParticipantView, PrizeProduct,
    ProductPrice, User, UserType,
};

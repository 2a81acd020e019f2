//! Domain model for the lottery service.
//!
//! The JSON field names match the wire format consumed by the dashboard
//! clients (snake_case row shapes with nested participants and users), so
//! these structs double as the API response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{LotteryId, ParticipantId, UserId};

/// Role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// May create lotteries and trigger winner selection.
    Admin,
    /// May join active lotteries.
    Participant,
}

/// An account, seeded out-of-band at first boot. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Login name, unique across all users.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Account role.
    pub user_type: UserType,
}

/// Lifecycle state of a lottery.
///
/// Transitions exactly once, `Active → Completed`, when the draw commits.
/// There is no transition out of `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotteryStatus {
    /// Accepting joins.
    Active,
    /// Winners drawn; closed forever.
    Completed,
}

/// Price of a catalog product, in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Amount in minor units (cents).
    pub cent_amount: u64,
}

/// Reference to a prize product from the external catalog.
///
/// Only the projection the dashboard needs is stored; the catalog itself is
/// an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeProduct {
    /// Catalog product identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stock keeping unit, if the catalog exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Primary image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Price of the master variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<ProductPrice>,
    /// Shop URL path for the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A named draw with a fixed capacity and winner count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lottery {
    /// Unique identifier.
    pub id: LotteryId,
    /// Display name.
    pub name: String,
    /// Capacity; the draw fires when the participant count reaches this.
    pub max_participants: u32,
    /// How many winners to select at the draw.
    pub number_of_winners: u32,
    /// Lifecycle state.
    pub status: LotteryStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Admin who created the lottery.
    pub created_by: UserId,
    /// Optional prize product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<PrizeProduct>,
}

impl Lottery {
    /// Whether the lottery is still accepting joins.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == LotteryStatus::Active
    }
}

/// Input for creating a lottery. Validated before insertion.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLottery {
    /// Display name.
    pub name: String,
    /// Capacity, at least 2.
    pub max_participants: u32,
    /// Winner count, at least 1 and strictly below the capacity.
    pub number_of_winners: u32,
    /// Admin creating the lottery.
    pub created_by: UserId,
    /// Optional prize product.
    #[serde(default)]
    pub prize: Option<PrizeProduct>,
}

/// A join record linking a user to a lottery, possibly flagged as a winner.
///
/// At most one record exists per `(lottery_id, user_id)` pair. `is_winner`
/// is set true at most once, by the draw, and never unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier.
    pub id: ParticipantId,
    /// The lottery joined.
    pub lottery_id: LotteryId,
    /// The joining user.
    pub user_id: UserId,
    /// Whether this record was selected by the draw.
    pub is_winner: bool,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

/// A participant with its user record nested, as returned by the listing
/// and winner-selection endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    /// Participation record identifier.
    pub id: ParticipantId,
    /// The joining user's identifier.
    pub user_id: UserId,
    /// Whether this record was selected by the draw.
    pub is_winner: bool,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
    /// The joining user.
    pub user: User,
}

impl ParticipantView {
    /// Combines a participation record with its user.
    pub fn new(participant: Participant, user: User) -> Self {
        Self {
            id: participant.id,
            user_id: participant.user_id,
            is_winner: participant.is_winner,
            joined_at: participant.joined_at,
            user,
        }
    }
}

/// A lottery with its participants nested, as returned by `GET /lotteries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryView {
    /// The lottery row.
    #[serde(flatten)]
    pub lottery: Lottery,
    /// All participation records, each with its user nested.
    pub participants: Vec<ParticipantView>,
}

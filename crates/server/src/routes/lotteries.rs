//! Lottery listing, creation, and the cache revalidation hook.

use axum::extract::State;
use axum::Json;
use serde_json::json;
use tombola_types::{validation, Lottery, LotteryView, TombolaError, UserType};

use crate::routes::{ApiError, ApiResult};
use crate::state::SharedState;

/// Counter: lotteries created.
pub const LOTTERIES_CREATED_TOTAL: &str = "lotteries_created_total";

/// `GET /lotteries` → every lottery with nested participants and users,
/// newest first. Served from the listing cache when warm.
pub async fn list(State(state): State<SharedState>) -> ApiResult<Json<Vec<LotteryView>>> {
    if let Some(snapshot) = state.listing.get() {
        return Ok(Json(snapshot.as_ref().clone()));
    }
    let views = state.store().list_lotteries_with_participants()?;
    let snapshot = state.listing.put(views);
    Ok(Json(snapshot.as_ref().clone()))
}

/// `POST /lotteries` → the created lottery.
///
/// Rejects invalid draw shapes (`max_participants < 2`,
/// `number_of_winners` outside `1..max_participants`) and non-admin
/// creators.
pub async fn create(
    State(state): State<SharedState>,
    Json(new): Json<tombola_types::NewLottery>,
) -> ApiResult<Json<Lottery>> {
    validation::validate_new_lottery(&new)?;

    let creator = state
        .store()
        .get_user(new.created_by)?
        .ok_or(TombolaError::UserNotFound { user_id: new.created_by })?;
    if creator.user_type != UserType::Admin {
        return Err(ApiError(TombolaError::Validation {
            field: "created_by".to_string(),
            constraint: "must reference an admin account".to_string(),
        }));
    }

    let lottery = state.store().create_lottery(&new)?;
    state.listing.invalidate();
    metrics::counter!(LOTTERIES_CREATED_TOTAL).increment(1);
    tracing::info!(lottery_id = %lottery.id, name = %lottery.name, "lottery created");
    Ok(Json(lottery))
}

/// `GET /lotteries/revalidate` → drops the cached listing so downstream
/// readers see fresh data on their next fetch.
pub async fn revalidate(State(state): State<SharedState>) -> Json<serde_json::Value> {
    state.listing.invalidate();
    Json(json!({ "revalidated": true, "now": chrono::Utc::now().timestamp_millis() }))
}

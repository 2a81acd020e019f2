//! Join and winner-selection endpoints.
//!
//! Request bodies use the camelCase field names the dashboard sends
//! (`lotteryId`, `userId`, `numberOfWinners`); responses use the row
//! shapes.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tombola_types::{LotteryId, TombolaError, UserId};

use crate::routes::{missing_field, ApiError, ApiResult};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    lottery_id: Option<LotteryId>,
    user_id: Option<UserId>,
}

/// `POST /lottery/join` → `{"success": true}`.
///
/// A join that fills the last slot triggers the draw; the join succeeds
/// even if that draw fails internally (the failure is logged and counted,
/// and selection can be re-run through `/lottery/select-winner`).
pub async fn join(
    State(state): State<SharedState>,
    Json(body): Json<JoinRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let lottery_id = body.lottery_id.ok_or_else(|| missing_field("lotteryId"))?;
    let user_id = body.user_id.ok_or_else(|| missing_field("userId"))?;

    let receipt = state.engine.join(lottery_id, user_id).await?;
    state.listing.invalidate();

    if let Some(code) = receipt.draw_error {
        // The join stands; surface the draw failure for operators without
        // failing the request.
        tracing::warn!(
            lottery_id = %lottery_id,
            code = %code,
            "join accepted but the fill-triggered draw failed; re-run selection"
        );
    }

    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectWinnerRequest {
    lottery_id: Option<LotteryId>,
    number_of_winners: Option<u32>,
}

/// `POST /lottery/select-winner` →
/// `{"success": true, "winners": [{id, user_id, user}]}`.
///
/// The admin-triggered draw; also the retry path after a failed
/// fill-triggered draw. Omitting `numberOfWinners` draws the lottery's
/// configured winner count. Requesting more winners than participants
/// awards everyone.
pub async fn select_winner(
    State(state): State<SharedState>,
    Json(body): Json<SelectWinnerRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let lottery_id = body.lottery_id.ok_or_else(|| missing_field("lotteryId"))?;
    if body.number_of_winners == Some(0) {
        return Err(ApiError(TombolaError::Validation {
            field: "numberOfWinners".to_string(),
            constraint: "must be at least 1".to_string(),
        }));
    }

    let outcome = state.engine.run_draw(lottery_id, body.number_of_winners).await?;
    state.listing.invalidate();

    let winners: Vec<serde_json::Value> = outcome
        .winners
        .iter()
        .map(|view| {
            json!({
                "id": view.id,
                "user_id": view.user_id,
                "user": view.user,
            })
        })
        .collect();

    Ok(Json(json!({ "success": true, "winners": winners })))
}

//! Login endpoint.
//!
//! A plain username/password equality check against the seeded demo
//! accounts. Deliberately not an authentication design: there are no
//! sessions and no hashing; the client carries the returned user id in
//! subsequent request bodies.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tombola_types::User;

use crate::routes::{missing_field, ApiResult};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

/// `POST /login` → the matching user, or 401.
pub async fn login(
    State(state): State<SharedState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<User>> {
    let username = body.username.as_deref().ok_or_else(|| missing_field("username"))?;
    let password = body.password.as_deref().ok_or_else(|| missing_field("password"))?;

    let user = state.store().authenticate(username, password)?;
    tracing::debug!(user_id = %user.id, username = %user.username, "login");
    Ok(Json(user))
}

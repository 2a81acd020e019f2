//! HTTP surface.
//!
//! All errors are converted to a structured JSON body
//! `{"error": <message>, "code": <numeric code>}` with the status mapped
//! from the error taxonomy. No error is fatal to the process; every
//! failure is scoped to its request.

mod auth;
mod lotteries;
mod lottery;
mod products;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tombola_types::TombolaError;

use crate::state::SharedState;

/// Builds the application router.
pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/login", post(auth::login))
        .route("/lotteries", get(lotteries::list).post(lotteries::create))
        .route("/lotteries/revalidate", get(lotteries::revalidate))
        .route("/lottery/join", post(lottery::join))
        .route("/lottery/select-winner", post(lottery::select_winner))
        .route("/products", get(products::list))
        .with_state(state)
}

/// Liveness probe.
async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Error wrapper that renders the taxonomy at the request boundary.
#[derive(Debug)]
pub struct ApiError(pub TombolaError);

impl From<TombolaError> for ApiError {
    fn from(err: TombolaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, code = %self.0.code(), "request failed");
        } else {
            tracing::debug!(error = %self.0, code = %self.0.code(), "request rejected");
        }
        let body = json!({
            "error": self.0.to_string(),
            "code": self.0.code().as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

/// Shorthand for handler results.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Builds the `Validation` error for a missing request field, mirroring
/// the explicit body checks the endpoints perform.
pub(crate) fn missing_field(field: &str) -> ApiError {
    ApiError(TombolaError::Validation {
        field: field.to_string(),
        constraint: "missing in request body".to_string(),
    })
}

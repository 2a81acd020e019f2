//! Product catalog proxy.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::catalog::ProductPage;
use crate::routes::ApiResult;
use crate::state::SharedState;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

/// `GET /products?limit&offset` → a page of catalog products.
pub async fn list(
    State(state): State<SharedState>,
    Query(query): Query<ProductsQuery>,
) -> ApiResult<Json<ProductPage>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let page = state.catalog.list(limit, offset)?;
    Ok(Json(page))
}

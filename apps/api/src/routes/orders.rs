//! Order read-back.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};

use storefront_core::{Order, OrderId};

use crate::error::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn get_order(
    State(state): State<AppState>,
    id: Result<Path<OrderId>, PathRejection>,
) -> ApiResult<ApiResponse<Order>> {
    let Path(id) = id?;
    let order = state
        .db
        .orders()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", id))?;
    Ok(ApiResponse::ok("Success", order))
}

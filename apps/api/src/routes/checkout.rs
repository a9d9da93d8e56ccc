//! Checkout endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use storefront_core::{CartItem, Order};

use crate::error::{ApiResponse, ApiResult};
use crate::state::AppState;

/// `{"items": [{"productId": 1, "quantity": 2}]}`
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

pub async fn checkout(
    State(state): State<AppState>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<Order>> {
    let Json(request) = body?;
    let order = state.checkout.checkout(&request.items).await?;
    Ok(ApiResponse::ok("Checkout berhasil", order))
}

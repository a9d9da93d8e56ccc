//! Catalog endpoints: list, read, create, replace, and delete products.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use storefront_core::validation::validate_new_product;
use storefront_core::{NewProduct, Product, ProductId};

use crate::error::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

/// `?name=` keeps products whose name contains the value, ignoring case.
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub name: Option<String>,
}

pub async fn list_products(
    State(state): State<AppState>,
    filter: Result<Query<ProductFilter>, QueryRejection>,
) -> ApiResult<ApiResponse<Vec<Product>>> {
    let Query(filter) = filter?;
    let products = state.db.products().list(filter.name.as_deref()).await?;
    Ok(ApiResponse::ok("Success", products))
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<ApiResponse<Product>> {
    let Json(product) = body?;
    validate_new_product(&product)?;

    let created = state.db.products().insert(&product).await?;
    info!(product_id = created.id, name = %created.name, stock = created.stock, "Product created");
    Ok(ApiResponse::ok("Product created successfully", created))
}

pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<ProductId>, PathRejection>,
) -> ApiResult<ApiResponse<Product>> {
    let Path(id) = id?;
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    Ok(ApiResponse::ok("Success", product))
}

pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<ProductId>, PathRejection>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<ApiResponse<Product>> {
    let Path(id) = id?;
    let Json(product) = body?;
    validate_new_product(&product)?;

    let updated = state.db.products().update(id, &product).await?;
    info!(product_id = id, name = %updated.name, stock = updated.stock, "Product updated");
    Ok(ApiResponse::ok("Product updated successfully", updated))
}

pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<ProductId>, PathRejection>,
) -> ApiResult<ApiResponse<()>> {
    let Path(id) = id?;
    state.db.products().delete(id).await?;
    Ok(ApiResponse::ok("Product deleted successfully", ()))
}

//! Category endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use storefront_core::validation::validate_new_category;
use storefront_core::{Category, CategoryId, NewCategory};

use crate::error::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<Category>>> {
    let categories = state.db.categories().list().await?;
    Ok(ApiResponse::ok("Success", categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    body: Result<Json<NewCategory>, JsonRejection>,
) -> ApiResult<ApiResponse<Category>> {
    let Json(category) = body?;
    validate_new_category(&category)?;

    let created = state.db.categories().insert(&category).await?;
    info!(category_id = created.id, name = %created.name, "Category created");
    Ok(ApiResponse::ok("Category created successfully", created))
}

pub async fn get_category(
    State(state): State<AppState>,
    id: Result<Path<CategoryId>, PathRejection>,
) -> ApiResult<ApiResponse<Category>> {
    let Path(id) = id?;
    let category = state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", id))?;
    Ok(ApiResponse::ok("Success", category))
}

pub async fn update_category(
    State(state): State<AppState>,
    id: Result<Path<CategoryId>, PathRejection>,
    body: Result<Json<NewCategory>, JsonRejection>,
) -> ApiResult<ApiResponse<Category>> {
    let Path(id) = id?;
    let Json(category) = body?;
    validate_new_category(&category)?;

    let updated = state.db.categories().update(id, &category).await?;
    info!(category_id = id, name = %updated.name, "Category updated");
    Ok(ApiResponse::ok("Category updated successfully", updated))
}

pub async fn delete_category(
    State(state): State<AppState>,
    id: Result<Path<CategoryId>, PathRejection>,
) -> ApiResult<ApiResponse<()>> {
    let Path(id) = id?;
    state.db.categories().delete(id).await?;
    Ok(ApiResponse::ok("Category deleted successfully", ()))
}

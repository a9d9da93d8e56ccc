//! Sales summary endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;

use storefront_core::SalesSummary;

use crate::error::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Optional `YYYY-MM-DD` bounds; both must be present for a range.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    #[serde(rename = "startDate", alias = "start_date")]
    pub start_date: Option<String>,

    #[serde(rename = "endDate", alias = "end_date")]
    pub end_date: Option<String>,
}

pub async fn sales_summary(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> ApiResult<ApiResponse<SalesSummary>> {
    let Query(params) = params?;
    let summary = state
        .reporting
        .get_summary(params.start_date.as_deref(), params.end_date.as_deref())
        .await?;
    Ok(ApiResponse::ok("Sales summary", summary))
}

//! # Sales Aggregator
//!
//! Revenue totals, order counts, and the best-selling product over "today"
//! or an inclusive date range. Read-only; every call is safe to retry.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};
use crate::store::SalesStore;
use storefront_core::{DateRange, ReportWindow, SalesSummary, SalesTotals, TopSellingProduct};

/// Computes sales figures from committed orders.
#[derive(Debug, Clone)]
pub struct SalesAggregator<S> {
    store: S,
}

impl<S: SalesStore> SalesAggregator<S> {
    pub fn new(store: S) -> Self {
        SalesAggregator { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Revenue and order count for the store's current day.
    pub async fn summary_today(&self) -> ServiceResult<SalesTotals> {
        self.totals(&ReportWindow::Today).await
    }

    /// Revenue and order count for `start..=end`.
    ///
    /// `end < start` is a validation error.
    pub async fn summary_for_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<SalesTotals> {
        let range = DateRange::new(start, end)?;
        self.totals(&ReportWindow::Range(range)).await
    }

    /// Best seller of the store's current day.
    ///
    /// `NotFound` when no order was placed today.
    pub async fn top_seller_today(&self) -> ServiceResult<TopSellingProduct> {
        self.top_seller(&ReportWindow::Today).await
    }

    /// Best seller for `start..=end`.
    pub async fn top_seller_for_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<TopSellingProduct> {
        let range = DateRange::new(start, end)?;
        self.top_seller(&ReportWindow::Range(range)).await
    }

    /// Totals over any window.
    pub async fn totals(&self, window: &ReportWindow) -> ServiceResult<SalesTotals> {
        let totals = self.store.totals(window).await?;
        debug!(
            window = %window,
            revenue = %totals.total_revenue,
            orders = totals.order_count,
            "Sales totals computed"
        );
        Ok(totals)
    }

    /// Best seller over any window; ties go to the smallest name.
    pub async fn top_seller(&self, window: &ReportWindow) -> ServiceResult<TopSellingProduct> {
        self.store
            .top_seller(window)
            .await?
            .ok_or_else(|| ServiceError::not_found("Orders", window))
    }

    /// Totals and top seller over one window, read together.
    ///
    /// Unlike [`Self::top_seller`], an empty window is not an error: the
    /// summary simply carries no top seller.
    pub async fn summary(&self, window: &ReportWindow) -> ServiceResult<SalesSummary> {
        let summary = self.store.summary(window).await?;
        debug!(
            window = %window,
            revenue = %summary.total_revenue,
            orders = summary.order_count,
            top_seller = summary.top_seller.as_ref().map(|top| top.name.as_str()),
            "Sales summary computed"
        );
        Ok(summary)
    }
}

//! # Reporting Facade
//!
//! Picks the report window from caller parameters and asks the aggregator
//! for one [`SalesSummary`] over it.
//!
//! ```text
//! get_summary(start?, end?)
//!      │
//!      ├── both present, non-blank ──► Range(start..=end) ─┐
//!      └── otherwise               ──► Today ──────────────┴─► aggregator.summary(window)
//!
//! Totals and top seller share the window and one read snapshot.
//! ```

use tracing::debug;

use crate::aggregator::SalesAggregator;
use crate::error::ServiceResult;
use crate::store::SalesStore;
use storefront_core::{ReportWindow, SalesSummary};

/// Single entry point for sales summaries.
#[derive(Debug, Clone)]
pub struct ReportingFacade<S> {
    aggregator: SalesAggregator<S>,
}

impl<S: SalesStore> ReportingFacade<S> {
    pub fn new(aggregator: SalesAggregator<S>) -> Self {
        ReportingFacade { aggregator }
    }

    /// Summary for raw `YYYY-MM-DD` parameters.
    ///
    /// Blank strings count as absent. A malformed date or `end < start`
    /// is a validation error.
    pub async fn get_summary(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> ServiceResult<SalesSummary> {
        let window = ReportWindow::from_params(start, end)?;
        self.summary_for(&window).await
    }

    /// Summary for an already-resolved window.
    ///
    /// A window without orders yields zero totals and no top seller.
    pub async fn summary_for(&self, window: &ReportWindow) -> ServiceResult<SalesSummary> {
        debug!(window = %window, "Building sales summary");

        self.aggregator.summary(window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use storefront_core::{Money, SalesTotals, TopSellingProduct};
    use storefront_db::DbResult;

    /// Records every window it is asked about.
    #[derive(Default)]
    struct RecordingStore {
        windows: Mutex<Vec<(&'static str, ReportWindow)>>,
    }

    impl RecordingStore {
        fn calls(&self) -> Vec<(&'static str, ReportWindow)> {
            self.windows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SalesStore for RecordingStore {
        async fn totals(&self, window: &ReportWindow) -> DbResult<SalesTotals> {
            self.windows.lock().unwrap().push(("totals", *window));
            Ok(SalesTotals {
                total_revenue: Money::from_cents(350),
                order_count: 2,
            })
        }

        async fn top_seller(&self, window: &ReportWindow) -> DbResult<Option<TopSellingProduct>> {
            self.windows.lock().unwrap().push(("top_seller", *window));
            Ok(Some(TopSellingProduct {
                name: "Product B".to_string(),
                quantity_sold: 5,
            }))
        }

        async fn summary(&self, window: &ReportWindow) -> DbResult<SalesSummary> {
            self.windows.lock().unwrap().push(("summary", *window));
            Ok(SalesSummary::new(
                SalesTotals {
                    total_revenue: Money::from_cents(350),
                    order_count: 2,
                },
                Some(TopSellingProduct {
                    name: "Product B".to_string(),
                    quantity_sold: 5,
                }),
            ))
        }
    }

    /// A store with no orders at all.
    struct EmptyStore;

    #[async_trait]
    impl SalesStore for EmptyStore {
        async fn totals(&self, _window: &ReportWindow) -> DbResult<SalesTotals> {
            Ok(SalesTotals::default())
        }

        async fn top_seller(&self, _window: &ReportWindow) -> DbResult<Option<TopSellingProduct>> {
            Ok(None)
        }

        async fn summary(&self, _window: &ReportWindow) -> DbResult<SalesSummary> {
            Ok(SalesSummary::new(SalesTotals::default(), None))
        }
    }

    fn facade<S: SalesStore>(store: S) -> ReportingFacade<S> {
        ReportingFacade::new(SalesAggregator::new(store))
    }

    fn recorded(facade: &ReportingFacade<RecordingStore>) -> Vec<(&'static str, ReportWindow)> {
        facade.aggregator.store().calls()
    }

    #[tokio::test]
    async fn test_no_dates_reads_one_summary_for_today() {
        let facade = facade(RecordingStore::default());

        let summary = facade.get_summary(None, None).await.unwrap();
        assert_eq!(summary.total_revenue, Money::from_cents(350));
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.top_seller.unwrap().name, "Product B");

        assert_eq!(recorded(&facade), vec![("summary", ReportWindow::Today)]);
    }

    #[tokio::test]
    async fn test_empty_dates_equal_absent_dates() {
        let absent = facade(RecordingStore::default());
        let empty = facade(RecordingStore::default());

        let a = absent.get_summary(None, None).await.unwrap();
        let b = empty.get_summary(Some(""), Some("")).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(recorded(&absent), recorded(&empty));
    }

    #[tokio::test]
    async fn test_range_is_read_as_one_summary() {
        let facade = facade(RecordingStore::default());

        facade
            .get_summary(Some("2026-03-01"), Some("2026-03-31"))
            .await
            .unwrap();

        let calls = recorded(&facade);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "summary");
        assert!(matches!(calls[0].1, ReportWindow::Range(_)));
    }

    #[tokio::test]
    async fn test_one_date_falls_back_to_today() {
        let facade = facade(RecordingStore::default());

        facade.get_summary(Some("2026-03-01"), None).await.unwrap();

        assert!(recorded(&facade)
            .iter()
            .all(|(_, window)| *window == ReportWindow::Today));
    }

    #[tokio::test]
    async fn test_bad_dates_fail_before_querying() {
        let facade = facade(RecordingStore::default());

        let err = facade
            .get_summary(Some("2026-03-31"), Some("2026-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = facade
            .get_summary(Some("31-03-2026"), Some("2026-04-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        assert!(recorded(&facade).is_empty());
    }

    #[tokio::test]
    async fn test_window_without_orders_has_no_top_seller() {
        let facade = facade(EmptyStore);

        let summary = facade.get_summary(None, None).await.unwrap();
        assert_eq!(summary.total_revenue, Money::zero());
        assert_eq!(summary.order_count, 0);
        assert!(summary.top_seller.is_none());
    }
}

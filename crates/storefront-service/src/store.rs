//! # Store Boundary
//!
//! Traits the services are written against.
//!
//! ```text
//! ┌──────────────────┐   begin()   ┌──────────────────┐
//! │  CheckoutStore   │ ──────────► │   CheckoutTx     │  lookup, decrement,
//! └──────────────────┘             │                  │  insert order/lines,
//!                                  └──────────────────┘  commit / rollback
//! ┌──────────────────┐
//! │   SalesStore     │  totals, top_seller, summary (per window)
//! └──────────────────┘
//!
//! Implemented for storefront_db::Database; tests plug in fakes.
//! ```

use async_trait::async_trait;

use storefront_core::{
    Money, OrderId, OrderLine, ProductId, ReportWindow, SalesSummary, SalesTotals,
    StockedProduct, TopSellingProduct,
};
use storefront_db::{CheckoutTransaction, Database, DbResult, OrderHeader};

/// Opens checkout units of work.
#[async_trait]
pub trait CheckoutStore: Send + Sync {
    type Tx: CheckoutTx;

    /// Opens a transaction. Nothing it does is visible until commit.
    async fn begin(&self) -> DbResult<Self::Tx>;
}

/// One all-or-nothing checkout.
#[async_trait]
pub trait CheckoutTx: Send {
    /// Plain read of name, price, and stock.
    async fn find_product(&mut self, id: ProductId) -> DbResult<Option<StockedProduct>>;

    /// Read that also locks the product against concurrent writers.
    async fn find_product_for_update(&mut self, id: ProductId)
        -> DbResult<Option<StockedProduct>>;

    /// Guarded decrement; `false` when stock would go negative.
    async fn decrement_stock(&mut self, id: ProductId, quantity: i64) -> DbResult<bool>;

    async fn insert_order(&mut self, total_amount: Money) -> DbResult<OrderHeader>;

    async fn insert_line(
        &mut self,
        order_id: OrderId,
        position: usize,
        line: &OrderLine,
    ) -> DbResult<()>;

    async fn commit(self) -> DbResult<()>;

    async fn rollback(self) -> DbResult<()>;
}

/// Read-only aggregate queries over committed orders.
#[async_trait]
pub trait SalesStore: Send + Sync {
    async fn totals(&self, window: &ReportWindow) -> DbResult<SalesTotals>;

    /// `None` when the window holds no orders.
    async fn top_seller(&self, window: &ReportWindow) -> DbResult<Option<TopSellingProduct>>;

    /// Totals and top seller read from one consistent snapshot.
    async fn summary(&self, window: &ReportWindow) -> DbResult<SalesSummary>;
}

// =============================================================================
// SQLite Implementations
// =============================================================================

#[async_trait]
impl CheckoutStore for Database {
    type Tx = CheckoutTransaction;

    async fn begin(&self) -> DbResult<CheckoutTransaction> {
        self.orders().begin().await
    }
}

#[async_trait]
impl CheckoutTx for CheckoutTransaction {
    async fn find_product(&mut self, id: ProductId) -> DbResult<Option<StockedProduct>> {
        CheckoutTransaction::find_product(self, id).await
    }

    async fn find_product_for_update(
        &mut self,
        id: ProductId,
    ) -> DbResult<Option<StockedProduct>> {
        CheckoutTransaction::find_product_for_update(self, id).await
    }

    async fn decrement_stock(&mut self, id: ProductId, quantity: i64) -> DbResult<bool> {
        CheckoutTransaction::decrement_stock(self, id, quantity).await
    }

    async fn insert_order(&mut self, total_amount: Money) -> DbResult<OrderHeader> {
        CheckoutTransaction::insert_order(self, total_amount).await
    }

    async fn insert_line(
        &mut self,
        order_id: OrderId,
        position: usize,
        line: &OrderLine,
    ) -> DbResult<()> {
        CheckoutTransaction::insert_line(self, order_id, position, line).await
    }

    async fn commit(self) -> DbResult<()> {
        CheckoutTransaction::commit(self).await
    }

    async fn rollback(self) -> DbResult<()> {
        CheckoutTransaction::rollback(self).await
    }
}

#[async_trait]
impl SalesStore for Database {
    async fn totals(&self, window: &ReportWindow) -> DbResult<SalesTotals> {
        self.sales().totals(window).await
    }

    async fn top_seller(&self, window: &ReportWindow) -> DbResult<Option<TopSellingProduct>> {
        self.sales().top_seller(window).await
    }

    async fn summary(&self, window: &ReportWindow) -> DbResult<SalesSummary> {
        self.sales().summary(window).await
    }
}

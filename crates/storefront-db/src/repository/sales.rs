//! # Sales Repository
//!
//! Read-only aggregate queries over committed orders.
//!
//! ## Window Filter
//! ```text
//! ReportWindow::Today        →  date(o.created_at) = date('now')
//! ReportWindow::Range(s, e)  →  date(o.created_at) BETWEEN s AND e
//! ```
//! Both forms compare calendar dates derived by SQLite from the stored UTC
//! timestamps, so "today" follows the store's clock and both range bounds
//! are inclusive.
//!
//! [`SalesRepository::summary`] runs both aggregates inside one read
//! transaction, so totals and top seller come from the same snapshot.

use sqlx::sqlite::SqliteArguments;
use sqlx::query::QueryAs;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use storefront_core::{Money, ReportWindow, SalesSummary, SalesTotals, TopSellingProduct};

/// Repository for sales reporting queries.
#[derive(Debug, Clone)]
pub struct SalesRepository {
    pool: SqlitePool,
}

impl SalesRepository {
    /// Creates a new SalesRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesRepository { pool }
    }

    /// Sums revenue and counts orders inside `window`.
    ///
    /// An empty window yields zero revenue and zero orders.
    pub async fn totals(&self, window: &ReportWindow) -> DbResult<SalesTotals> {
        debug!(window = %window, "Querying sales totals");
        fetch_totals(&self.pool, window).await
    }

    /// Finds the product name with the highest summed quantity inside
    /// `window`.
    ///
    /// Lines are grouped by the name snapshot taken at checkout. Ties go to
    /// the lexicographically smallest name. `None` when the window holds no
    /// orders.
    pub async fn top_seller(&self, window: &ReportWindow) -> DbResult<Option<TopSellingProduct>> {
        debug!(window = %window, "Querying top seller");
        fetch_top_seller(&self.pool, window).await
    }

    /// Totals and top seller for `window`, read from one snapshot.
    pub async fn summary(&self, window: &ReportWindow) -> DbResult<SalesSummary> {
        debug!(window = %window, "Querying sales summary");

        let mut tx = self.pool.begin().await?;
        let totals = fetch_totals(&mut *tx, window).await?;
        let top_seller = fetch_top_seller(&mut *tx, window).await?;
        tx.commit().await?;

        Ok(SalesSummary::new(totals, top_seller))
    }
}

async fn fetch_totals(
    conn: impl Executor<'_, Database = Sqlite>,
    window: &ReportWindow,
) -> DbResult<SalesTotals> {
    let sql = format!(
        r#"
        SELECT COALESCE(SUM(o.total_amount_cents), 0) AS total_revenue_cents,
               COUNT(*) AS order_count
        FROM orders o
        WHERE {}
        "#,
        window_filter(window)
    );

    let row = bind_window(sqlx::query_as::<_, TotalsRecord>(&sql), window)
        .fetch_one(conn)
        .await?;

    Ok(SalesTotals {
        total_revenue: Money::from_cents(row.total_revenue_cents),
        order_count: row.order_count,
    })
}

async fn fetch_top_seller(
    conn: impl Executor<'_, Database = Sqlite>,
    window: &ReportWindow,
) -> DbResult<Option<TopSellingProduct>> {
    let sql = format!(
        r#"
        SELECT l.product_name AS name,
               SUM(l.quantity) AS quantity_sold
        FROM order_lines l
        JOIN orders o ON o.id = l.order_id
        WHERE {}
        GROUP BY l.product_name
        ORDER BY quantity_sold DESC, l.product_name ASC
        LIMIT 1
        "#,
        window_filter(window)
    );

    let row = bind_window(sqlx::query_as::<_, TopSellerRecord>(&sql), window)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(|row| TopSellingProduct {
        name: row.name,
        quantity_sold: row.quantity_sold,
    }))
}

/// WHERE clause selecting orders `o` inside the window.
fn window_filter(window: &ReportWindow) -> &'static str {
    match window {
        ReportWindow::Today => "date(o.created_at) = date('now')",
        ReportWindow::Range(_) => "date(o.created_at) BETWEEN ?1 AND ?2",
    }
}

/// Binds the range bounds expected by [`window_filter`].
fn bind_window<'q, O>(
    query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    window: &ReportWindow,
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    match window {
        ReportWindow::Today => query,
        ReportWindow::Range(range) => query.bind(range.start()).bind(range.end()),
    }
}

// =============================================================================
// Record Types
// =============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
struct TotalsRecord {
    total_revenue_cents: i64,
    order_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct TopSellerRecord {
    name: String,
    quantity_sold: i64,
}

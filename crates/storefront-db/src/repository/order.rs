//! # Order Repository
//!
//! The checkout unit of work and order read-back.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db.orders().begin()  ──► CheckoutTransaction (one pooled connection)  │
//! │                                                                         │
//! │  per cart line, in input order:                                        │
//! │    find_product_for_update(id)   UPDATE … SET stock = stock RETURNING  │
//! │    or find_product(id)           plain SELECT                          │
//! │    decrement_stock(id, qty)      UPDATE … WHERE stock >= qty           │
//! │                                                                         │
//! │  insert_order(total)             INSERT … RETURNING id, created_at     │
//! │  insert_line(order, pos, line)   one row per cart line                 │
//! │                                                                         │
//! │  commit()   ── all rows become visible at once                         │
//! │  rollback() ── nothing survives (also on drop)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking Read
//! SQLite has no `SELECT … FOR UPDATE`. A no-op `UPDATE … RETURNING` is the
//! equivalent: it takes the database write lock before returning the row,
//! so no other checkout can change the stock this transaction just read.
//! Competing writers wait up to the configured busy timeout.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::DbResult;
use storefront_core::{Money, Order, OrderId, OrderLine, ProductId, StockedProduct};

/// Id and store-assigned timestamp of a freshly inserted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderHeader {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Opens a checkout transaction.
    pub async fn begin(&self) -> DbResult<CheckoutTransaction> {
        let tx = self.pool.begin().await?;
        debug!("Checkout transaction opened");
        Ok(CheckoutTransaction { tx })
    }

    /// Gets an order with its lines in checkout order.
    pub async fn get_by_id(&self, id: OrderId) -> DbResult<Option<Order>> {
        let header = sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT id, total_amount_cents, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, OrderLineRecord>(
            r#"
            SELECT product_id, product_name, quantity, subtotal_cents
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Order {
            id: header.id,
            total_amount: Money::from_cents(header.total_amount_cents),
            created_at: header.created_at,
            lines: lines.into_iter().map(OrderLine::from).collect(),
        }))
    }

    /// Counts committed orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Checkout Transaction
// =============================================================================

/// One all-or-nothing checkout against the catalog and order tables.
///
/// Dropping it without calling [`commit`](Self::commit) rolls everything
/// back.
pub struct CheckoutTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl std::fmt::Debug for CheckoutTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutTransaction").finish_non_exhaustive()
    }
}

impl CheckoutTransaction {
    /// Reads name, price, and stock without locking.
    pub async fn find_product(&mut self, id: ProductId) -> DbResult<Option<StockedProduct>> {
        debug!(product_id = id, "Reading product");

        let row = sqlx::query_as::<_, StockedProductRecord>(
            r#"
            SELECT id, name, price_cents, stock
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(StockedProduct::from))
    }

    /// Reads name, price, and stock while taking the write lock.
    pub async fn find_product_for_update(
        &mut self,
        id: ProductId,
    ) -> DbResult<Option<StockedProduct>> {
        debug!(product_id = id, "Reading product for update");

        let row = sqlx::query_as::<_, StockedProductRecord>(
            r#"
            UPDATE products
            SET stock = stock
            WHERE id = ?1
            RETURNING id, name, price_cents, stock
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(StockedProduct::from))
    }

    /// Takes `quantity` units out of stock.
    ///
    /// Returns `false` if the product is missing or holds fewer than
    /// `quantity` units; nothing is changed in that case.
    pub async fn decrement_stock(&mut self, id: ProductId, quantity: i64) -> DbResult<bool> {
        debug!(product_id = id, quantity, "Decrementing stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - ?2,
                updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Inserts the order row; the store assigns id and timestamp.
    pub async fn insert_order(&mut self, total_amount: Money) -> DbResult<OrderHeader> {
        let header = sqlx::query_as::<_, OrderHeader>(
            r#"
            INSERT INTO orders (total_amount_cents)
            VALUES (?1)
            RETURNING id, created_at
            "#,
        )
        .bind(total_amount.cents())
        .fetch_one(&mut *self.tx)
        .await?;

        debug!(order_id = header.id, total = %total_amount, "Order row inserted");
        Ok(header)
    }

    /// Inserts one order line at `position` (0-based, input order).
    pub async fn insert_line(
        &mut self,
        order_id: OrderId,
        position: usize,
        line: &OrderLine,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO order_lines (
                order_id, position, product_id, product_name, quantity, subtotal_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(order_id)
        .bind(position as i64)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.quantity)
        .bind(line.subtotal.cents())
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    /// Commits every change made through this transaction.
    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await?;
        debug!("Checkout transaction committed");
        Ok(())
    }

    /// Discards every change made through this transaction.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx.rollback().await?;
        debug!("Checkout transaction rolled back");
        Ok(())
    }
}

// =============================================================================
// Record Types
// =============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
struct StockedProductRecord {
    id: i64,
    name: String,
    price_cents: i64,
    stock: i64,
}

impl From<StockedProductRecord> for StockedProduct {
    fn from(row: StockedProductRecord) -> Self {
        StockedProduct {
            id: row.id,
            name: row.name,
            price: Money::from_cents(row.price_cents),
            stock: row.stock,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRecord {
    id: i64,
    total_amount_cents: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderLineRecord {
    product_id: i64,
    product_name: String,
    quantity: i64,
    subtotal_cents: i64,
}

impl From<OrderLineRecord> for OrderLine {
    fn from(row: OrderLineRecord) -> Self {
        OrderLine {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            subtotal: Money::from_cents(row.subtotal_cents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use storefront_core::NewProduct;

    async fn seeded() -> (Database, ProductId) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&NewProduct {
                name: "Kopi Susu".to_string(),
                price: Money::from_cents(1800),
                stock: 5,
                category_id: None,
            })
            .await
            .unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn test_commit_persists_order_and_stock() {
        let (db, product_id) = seeded().await;

        let mut tx = db.orders().begin().await.unwrap();
        let product = tx.find_product_for_update(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 5);

        let line = product.price_line(2).unwrap();
        assert!(tx.decrement_stock(product_id, 2).await.unwrap());
        let header = tx.insert_order(line.subtotal).await.unwrap();
        tx.insert_line(header.id, 0, &line).await.unwrap();
        tx.commit().await.unwrap();

        let order = db.orders().get_by_id(header.id).await.unwrap().unwrap();
        assert_eq!(order.total_amount, Money::from_cents(3600));
        assert_eq!(order.created_at, header.created_at);
        assert_eq!(order.lines, vec![line]);

        let stock = db.products().get_by_id(product_id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 3);
    }

    #[tokio::test]
    async fn test_rollback_discards_everything() {
        let (db, product_id) = seeded().await;

        let mut tx = db.orders().begin().await.unwrap();
        assert!(tx.decrement_stock(product_id, 5).await.unwrap());
        tx.insert_order(Money::from_cents(9000)).await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(db.orders().count().await.unwrap(), 0);
        let stock = db.products().get_by_id(product_id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 5);
    }

    #[tokio::test]
    async fn test_drop_rolls_back() {
        let (db, product_id) = seeded().await;

        {
            let mut tx = db.orders().begin().await.unwrap();
            assert!(tx.decrement_stock(product_id, 1).await.unwrap());
        }

        let stock = db.products().get_by_id(product_id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 5);
    }

    #[tokio::test]
    async fn test_guarded_decrement_refuses_oversell() {
        let (db, product_id) = seeded().await;

        let mut tx = db.orders().begin().await.unwrap();
        assert!(!tx.decrement_stock(product_id, 6).await.unwrap());
        assert!(!tx.decrement_stock(999, 1).await.unwrap());
        let product = tx.find_product(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 5);
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_lookup_of_missing_product() {
        let (db, _) = seeded().await;

        let mut tx = db.orders().begin().await.unwrap();
        assert!(tx.find_product(42).await.unwrap().is_none());
        assert!(tx.find_product_for_update(42).await.unwrap().is_none());
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_lines_read_back_in_position_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut ids = Vec::new();
        for name in ["Zebra Cake", "Apple Pie", "Mango Lassi"] {
            let product = db
                .products()
                .insert(&NewProduct {
                    name: name.to_string(),
                    price: Money::from_cents(100),
                    stock: 10,
                    category_id: None,
                })
                .await
                .unwrap();
            ids.push(product.id);
        }

        let mut tx = db.orders().begin().await.unwrap();
        let mut lines = Vec::new();
        for id in &ids {
            let product = tx.find_product(*id).await.unwrap().unwrap();
            lines.push(product.price_line(1).unwrap());
        }
        let header = tx.insert_order(Money::from_cents(300)).await.unwrap();
        for (position, line) in lines.iter().enumerate() {
            tx.insert_line(header.id, position, line).await.unwrap();
        }
        tx.commit().await.unwrap();

        let order = db.orders().get_by_id(header.id).await.unwrap().unwrap();
        let names: Vec<&str> = order.lines.iter().map(|l| l.product_name.as_str()).collect();
        assert_eq!(names, vec!["Zebra Cake", "Apple Pie", "Mango Lassi"]);
    }

    #[tokio::test]
    async fn test_get_missing_order() {
        let (db, _) = seeded().await;
        assert!(db.orders().get_by_id(1).await.unwrap().is_none());
    }
}

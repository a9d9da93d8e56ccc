//! # Product Repository
//!
//! Catalog rows: list with a name filter, point lookup, insert, full
//! replacement, and delete.
//!
//! Checkout takes units out of stock through
//! [`CheckoutTransaction`](super::order::CheckoutTransaction), inside the
//! order's transaction. `update` here replaces the stock level wholesale,
//! which is how a product gets restocked.
//!
//! ## Category Join
//! ```text
//! products p ──LEFT JOIN──► categories c     category_name = c.name
//!     category_id NULL  ──►  category_name NULL
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use storefront_core::{CategoryId, Money, NewProduct, Product, ProductId};

/// Columns of [`ProductRecord`], joined with the category name.
const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.name, p.price_cents, p.stock, p.category_id,
           c.name AS category_name, p.created_at, p.updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products in id order.
    ///
    /// `name_filter` keeps products whose name contains it, ignoring ASCII
    /// case. `None` or a blank filter lists everything.
    pub async fn list(&self, name_filter: Option<&str>) -> DbResult<Vec<Product>> {
        let filter = name_filter.map(str::trim).filter(|f| !f.is_empty());
        debug!(filter = ?filter, "Listing products");

        let rows = match filter {
            Some(filter) => {
                let sql = format!(
                    "{PRODUCT_SELECT} WHERE p.name LIKE '%' || ?1 || '%' ESCAPE '\\' ORDER BY p.id"
                );
                sqlx::query_as::<_, ProductRecord>(&sql)
                    .bind(escape_like(filter))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{PRODUCT_SELECT} ORDER BY p.id");
                sqlx::query_as::<_, ProductRecord>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        fetch_product(&self.pool, id).await
    }

    /// Inserts a product and returns it with its assigned id and timestamps.
    ///
    /// A `category_id` with no matching category is `NotFound("Category")`.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        let name = product.name.trim();
        debug!(name = %name, price = %product.price, stock = product.stock, "Inserting product");

        let mut tx = self.pool.begin().await?;

        let id: ProductId = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, price_cents, stock, category_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(product.price.cents())
        .bind(product.stock)
        .bind(product.category_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| missing_category(err.into(), product.category_id))?;

        let created = fetch_product(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;
        tx.commit().await?;

        Ok(created)
    }

    /// Replaces every editable field of product `id`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The product as stored after the update
    /// * `Err(DbError::NotFound)` - No such product, or no such category
    pub async fn update(&self, id: ProductId, product: &NewProduct) -> DbResult<Product> {
        let name = product.name.trim();
        debug!(id, name = %name, "Updating product");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price_cents = ?3,
                stock = ?4,
                category_id = ?5,
                updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(product.price.cents())
        .bind(product.stock)
        .bind(product.category_id)
        .execute(&mut *tx)
        .await
        .map_err(|err| missing_category(err.into(), product.category_id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        let updated = fetch_product(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;
        tx.commit().await?;

        Ok(updated)
    }

    /// Deletes product `id`.
    ///
    /// A product that appears on an order line is kept and the call fails
    /// with `InUse`; order history never loses its product reference.
    pub async fn delete(&self, id: ProductId) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| match DbError::from(err) {
                DbError::ForeignKeyViolation { .. } => DbError::InUse {
                    entity: "Product".to_string(),
                    id: id.to_string(),
                },
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(id, "Product deleted");
        Ok(())
    }

    /// Counts catalog rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn fetch_product(
    conn: impl Executor<'_, Database = Sqlite>,
    id: ProductId,
) -> DbResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE p.id = ?1");
    let row = sqlx::query_as::<_, ProductRecord>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(Product::from))
}

/// The only foreign key a product write can break is its category.
fn missing_category(err: DbError, category_id: Option<CategoryId>) -> DbError {
    match (err, category_id) {
        (DbError::ForeignKeyViolation { .. }, Some(category_id)) => {
            DbError::not_found("Category", category_id)
        }
        (err, _) => err,
    }
}

/// Escapes LIKE wildcards so the filter matches literally.
fn escape_like(filter: &str) -> String {
    let mut escaped = String::with_capacity(filter.len());
    for c in filter.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Record Types
// =============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRecord {
    id: i64,
    name: String,
    price_cents: i64,
    stock: i64,
    category_id: Option<i64>,
    category_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRecord> for Product {
    fn from(row: ProductRecord) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price: Money::from_cents(row.price_cents),
            stock: row.stock,
            category_id: row.category_id,
            category_name: row.category_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

//! # Category Repository
//!
//! Category rows. Deleting a category leaves its products in place with
//! `category_id` cleared by the schema's `ON DELETE SET NULL`.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use storefront_core::{Category, CategoryId, NewCategory};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists every category in id order.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, description FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Gets a category by id.
    pub async fn get_by_id(&self, id: CategoryId) -> DbResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Inserts a category and returns it with its assigned id.
    pub async fn insert(&self, category: &NewCategory) -> DbResult<Category> {
        let name = category.name.trim();
        debug!(name = %name, "Inserting category");

        let row = sqlx::query_as::<_, CategoryRecord>(
            r#"
            INSERT INTO categories (name, description)
            VALUES (?1, ?2)
            RETURNING id, name, description
            "#,
        )
        .bind(name)
        .bind(category.description.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replaces the name and description of category `id`.
    pub async fn update(&self, id: CategoryId, category: &NewCategory) -> DbResult<Category> {
        let name = category.name.trim();
        debug!(id, name = %name, "Updating category");

        let row = sqlx::query_as::<_, CategoryRecord>(
            r#"
            UPDATE categories SET name = ?2, description = ?3
            WHERE id = ?1
            RETURNING id, name, description
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category.description.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Category::from)
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes category `id`; its products become uncategorized.
    pub async fn delete(&self, id: CategoryId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        info!(id, "Category deleted");
        Ok(())
    }
}

// =============================================================================
// Record Types
// =============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
struct CategoryRecord {
    id: i64,
    name: String,
    description: Option<String>,
}

impl From<CategoryRecord> for Category {
    fn from(row: CategoryRecord) -> Self {
        Category {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

//! # Domain Types
//!
//! Core domain types of the checkout and reporting subsystem.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  product_id     │       │
//! │  │  name           │   │  total_amount   │   │  product_name   │       │
//! │  │  price          │   │  created_at     │   │  quantity       │       │
//! │  │  stock          │   │  lines ─────────┼──►│  subtotal       │       │
//! │  │  category_id ───┼─┐ └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘ │ ┌─────────────────┐                              │
//! │                      └►│    Category     │  optional; deleting one      │
//! │                        │  id, name,      │  leaves its products         │
//! │                        │  description    │  uncategorized               │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartItem     │   │   SalesTotals   │   │  SalesSummary   │       │
//! │  │  (input only)   │   │  total_revenue  │   │  totals +       │       │
//! │  │  product_id     │   │  order_count    │   │  top_seller     │       │
//! │  │  quantity       │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An [`OrderLine`] copies the product name at checkout time, so historical
//! reports stay stable even if the product is renamed later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Catalog identifier of a product.
pub type ProductId = i64;

/// Store-assigned identifier of an order.
pub type OrderId = i64;

/// Catalog identifier of a category.
pub type CategoryId = i64;

// =============================================================================
// Category
// =============================================================================

/// A grouping of catalog products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

/// Fields supplied when creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,

    /// Display name; copied onto order lines at checkout.
    pub name: String,

    /// Unit price in minor units.
    pub price: Money,

    /// Units on hand. Never negative.
    pub stock: i64,

    pub category_id: Option<CategoryId>,

    /// Joined from the category row when the product has one.
    pub category_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when adding a product to the catalog or replacing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// The slice of a product a checkout reads inside its transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockedProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub stock: i64,
}

impl StockedProduct {
    /// Prices a cart line against this product.
    ///
    /// Fails with [`CoreError::InsufficientStock`] when `quantity` exceeds
    /// the stock visible to the transaction, and with
    /// [`CoreError::AmountOverflow`] if the subtotal is not representable.
    pub fn price_line(&self, quantity: i64) -> CoreResult<OrderLine> {
        if quantity > self.stock {
            return Err(CoreError::InsufficientStock {
                product_id: self.id,
                name: self.name.clone(),
                available: self.stock,
                requested: quantity,
            });
        }

        let subtotal = self
            .price
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| CoreError::AmountOverflow {
                context: format!("subtotal for product {}", self.id),
            })?;

        Ok(OrderLine {
            product_id: self.id,
            product_name: self.name.clone(),
            quantity,
            subtotal,
        })
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One requested line of a checkout. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(alias = "product_id")]
    pub product_id: ProductId,
    pub quantity: i64,
}

impl CartItem {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        CartItem {
            product_id,
            quantity,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A committed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,

    /// Sum of the line subtotals.
    pub total_amount: Money,

    /// Assigned by the store at insert time.
    pub created_at: DateTime<Utc>,

    /// Lines in the order the caller supplied them.
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Recomputes the total from the lines.
    pub fn lines_total(&self) -> Money {
        self.lines.iter().map(|line| line.subtotal).sum()
    }
}

/// A line item in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    /// Product name at time of checkout (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// quantity × unit price at time of checkout.
    pub subtotal: Money,
}

// =============================================================================
// Reporting
// =============================================================================

/// Revenue and order count over a report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub total_revenue: Money,
    pub order_count: i64,
}

/// The product with the highest summed quantity in a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingProduct {
    pub name: String,
    pub quantity_sold: i64,
}

/// Combined report: totals and top seller over one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_revenue: Money,
    pub order_count: i64,
    /// `None` when the window holds no orders.
    pub top_seller: Option<TopSellingProduct>,
}

impl SalesSummary {
    pub fn new(totals: SalesTotals, top_seller: Option<TopSellingProduct>) -> Self {
        SalesSummary {
            total_revenue: totals.total_revenue,
            order_count: totals.order_count,
            top_seller,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Checkout Engine
//!
//! Turns a cart into a committed order while taking the ordered units out of
//! stock, as one all-or-nothing unit of work.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(items)                                                        │
//! │       │                                                                 │
//! │       ├── validate_cart ──✗──► Validation   (store never touched)      │
//! │       ▼                                                                 │
//! │  begin ─► for each item, in input order:                                │
//! │              lookup (locking or plain, per LockStrategy)               │
//! │                 └─✗─► NotFound                                          │
//! │              price_line: qty > stock ─✗─► InsufficientStock             │
//! │              guarded decrement                                          │
//! │                 └─✗─► InsufficientStock (pessimistic) / Conflict       │
//! │           insert order ─► insert lines (same order as the cart)        │
//! │           commit                                                        │
//! │                                                                         │
//! │  Any ✗ after begin ─► rollback: no stock change, no order row          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lock Strategies
//! ```text
//! Pessimistic            lookup takes the write lock; later checkouts on
//!                        the same store queue behind it. One attempt.
//!
//! Optimistic { n }       plain lookups; a write conflict or a guard miss
//!                        aborts the attempt (already rolled back) and the
//!                        whole transaction is re-run, up to n attempts.
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::store::{CheckoutStore, CheckoutTx};
use storefront_core::validation::validate_cart;
use storefront_core::{CartItem, CoreError, Money, Order, StockedProduct};
use storefront_db::DbError;

/// Attempts an optimistic checkout gets unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// First delay between optimistic attempts; doubles per attempt, with jitter.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(10);

// =============================================================================
// Lock Strategy
// =============================================================================

/// How a checkout protects the stock it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockStrategy {
    /// Lock each product on lookup, then check and decrement.
    #[default]
    Pessimistic,

    /// Read without locking, decrement with a stock guard, re-run the whole
    /// transaction on conflict.
    Optimistic { max_attempts: u32 },
}

impl LockStrategy {
    /// Optimistic strategy with [`DEFAULT_MAX_ATTEMPTS`].
    pub fn optimistic() -> Self {
        LockStrategy::Optimistic {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the attempt budget; no effect on `Pessimistic`.
    pub fn with_max_attempts(self, attempts: u32) -> Self {
        match self {
            LockStrategy::Pessimistic => LockStrategy::Pessimistic,
            LockStrategy::Optimistic { .. } => LockStrategy::Optimistic {
                max_attempts: attempts.max(1),
            },
        }
    }

    /// Number of times a checkout may run its transaction.
    pub fn max_attempts(&self) -> u32 {
        match self {
            LockStrategy::Pessimistic => 1,
            LockStrategy::Optimistic { max_attempts } => (*max_attempts).max(1),
        }
    }
}

impl fmt::Display for LockStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockStrategy::Pessimistic => write!(f, "pessimistic"),
            LockStrategy::Optimistic { .. } => write!(f, "optimistic"),
        }
    }
}

/// Unknown lock strategy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown lock strategy '{0}' (expected 'pessimistic' or 'optimistic')")]
pub struct ParseLockStrategyError(String);

impl FromStr for LockStrategy {
    type Err = ParseLockStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pessimistic" => Ok(LockStrategy::Pessimistic),
            "optimistic" => Ok(LockStrategy::optimistic()),
            _ => Err(ParseLockStrategyError(s.to_string())),
        }
    }
}

// =============================================================================
// Checkout Engine
// =============================================================================

/// Converts carts into committed orders.
#[derive(Debug)]
pub struct CheckoutEngine<S> {
    store: S,
    strategy: LockStrategy,
    retry_backoff: Duration,
}

impl<S: CheckoutStore> CheckoutEngine<S> {
    pub fn new(store: S, strategy: LockStrategy) -> Self {
        CheckoutEngine {
            store,
            strategy,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Sets the first delay between optimistic attempts.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Checks out `items` as one order.
    ///
    /// ## Errors
    /// - `Validation`: empty cart, bad id or quantity
    /// - `NotFound`: a product id does not exist
    /// - `InsufficientStock`: a line asks for more than is on hand
    /// - `Storage`: the store failed (including a conflict that outlived
    ///   every optimistic attempt)
    pub async fn checkout(&self, items: &[CartItem]) -> ServiceResult<Order> {
        validate_cart(items)?;

        let max_attempts = self.strategy.max_attempts();
        let mut backoff = self.retry_schedule();
        let mut attempt = 1;

        loop {
            match self.run_once(items).await {
                Ok(order) => {
                    info!(
                        order_id = order.id,
                        total = %order.total_amount,
                        lines = order.lines.len(),
                        attempt,
                        strategy = %self.strategy,
                        "Checkout committed"
                    );
                    return Ok(order);
                }
                Err(err) if err.is_conflict() && attempt < max_attempts => {
                    warn!(attempt, max_attempts, error = %err, "Checkout conflicted, retrying");
                    let delay = backoff.next_backoff().unwrap_or(self.retry_backoff);
                    debug!(attempt, delay_ms = delay.as_millis() as u64, "Backing off");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    match &err {
                        ServiceError::Storage(_) => {
                            error!(attempt, strategy = %self.strategy, error = %err, "Checkout failed")
                        }
                        _ => warn!(error = %err, "Checkout rejected"),
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Delays between optimistic attempts, capped at `max_attempts` times the
    /// first delay.
    fn retry_schedule(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.retry_backoff,
            max_interval: self.retry_backoff * self.strategy.max_attempts(),
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        };
        backoff.reset();
        backoff
    }

    /// One transaction: apply the cart, then commit or roll back.
    async fn run_once(&self, items: &[CartItem]) -> ServiceResult<Order> {
        let mut tx = self.store.begin().await?;

        match self.apply(&mut tx, items).await {
            Ok(order) => {
                tx.commit().await?;
                Ok(order)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn apply(&self, tx: &mut S::Tx, items: &[CartItem]) -> ServiceResult<Order> {
        let mut lines = Vec::with_capacity(items.len());
        let mut total = Money::zero();

        for item in items {
            let product = self
                .lookup(tx, item)
                .await?
                .ok_or(CoreError::ProductNotFound(item.product_id))?;

            let line = product.price_line(item.quantity)?;

            if !tx.decrement_stock(item.product_id, item.quantity).await? {
                return Err(self.guard_miss(&product, item.quantity));
            }

            total = total
                .checked_add(line.subtotal)
                .ok_or_else(|| CoreError::AmountOverflow {
                    context: "order total".to_string(),
                })?;
            lines.push(line);
        }

        let header = tx.insert_order(total).await?;
        for (position, line) in lines.iter().enumerate() {
            tx.insert_line(header.id, position, line).await?;
        }
        debug!(order_id = header.id, lines = lines.len(), "Order staged");

        Ok(Order {
            id: header.id,
            total_amount: total,
            created_at: header.created_at,
            lines,
        })
    }

    async fn lookup(
        &self,
        tx: &mut S::Tx,
        item: &CartItem,
    ) -> ServiceResult<Option<StockedProduct>> {
        let product = match self.strategy {
            LockStrategy::Pessimistic => tx.find_product_for_update(item.product_id).await?,
            LockStrategy::Optimistic { .. } => tx.find_product(item.product_id).await?,
        };
        Ok(product)
    }

    /// The stock guard refused a decrement the lookup allowed.
    fn guard_miss(&self, product: &StockedProduct, requested: i64) -> ServiceError {
        match self.strategy {
            LockStrategy::Pessimistic => ServiceError::InsufficientStock {
                product_id: product.id,
                name: product.name.clone(),
                available: product.stock,
                requested,
            },
            LockStrategy::Optimistic { .. } => ServiceError::Storage(DbError::Conflict(format!(
                "stock of product {} changed during checkout",
                product.id
            ))),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

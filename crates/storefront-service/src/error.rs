//! # Service Error Types
//!
//! The four failure kinds callers of checkout and reporting see.
//!
//! ```text
//! ValidationError ─┐
//! CoreError ───────┼──► ServiceError ──► ApiError (400 / 404 / 409 / 500)
//! DbError ─────────┘
//! ```

use thiserror::Error;

use storefront_core::{CoreError, ProductId, ValidationError};
use storefront_db::DbError;

/// Checkout and reporting failures, typed by kind.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or empty input, or an inverted date range.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced product, order, or report window with no orders.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A cart line asks for more units than the product holds.
    #[error("Insufficient stock for {name} (product {product_id}): available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Any failure of the underlying store.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Checks if the error is a store write conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ServiceError::Storage(err) if err.is_conflict())
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ServiceError::not_found("Product", id),
            CoreError::InsufficientStock {
                product_id,
                name,
                available,
                requested,
            } => ServiceError::InsufficientStock {
                product_id,
                name,
                available,
                requested,
            },
            CoreError::AmountOverflow { context } => {
                ServiceError::Validation(ValidationError::InvalidFormat {
                    field: "amount".to_string(),
                    reason: format!("overflow while computing {context}"),
                })
            }
            CoreError::Validation(err) => ServiceError::Validation(err),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_kind() {
        let err: ServiceError = CoreError::ProductNotFound(9).into();
        match err {
            ServiceError::NotFound { entity, id } => {
                assert_eq!(entity, "Product");
                assert_eq!(id, "9");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err: ServiceError = CoreError::InsufficientStock {
            product_id: 1,
            name: "Bakso".to_string(),
            available: 0,
            requested: 1,
        }
        .into();
        assert!(matches!(err, ServiceError::InsufficientStock { .. }));
    }

    #[test]
    fn test_conflict_detection() {
        assert!(ServiceError::Storage(DbError::Conflict("database is locked".into())).is_conflict());
        assert!(!ServiceError::Storage(DbError::PoolExhausted).is_conflict());
        assert!(!ServiceError::not_found("Product", 1).is_conflict());
    }
}

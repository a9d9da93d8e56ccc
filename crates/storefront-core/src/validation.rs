//! # Validation Module
//!
//! Business-rule validation for checkout carts and catalog input.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json / Query)                           │
//! │  └── Shape and type checks (deserialization)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Cart non-empty, positive ids and quantities                       │
//! │  └── Runs before the store is touched                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── CHECK (stock >= 0), CHECK (price_cents >= 0)                      │
//! │  └── Foreign keys from order_lines to orders/products                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::CartItem;
//! use storefront_core::validation::{validate_cart, validate_quantity};
//!
//! validate_quantity(5).unwrap();
//! validate_cart(&[CartItem::new(1, 2)]).unwrap();
//! assert!(validate_cart(&[]).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CartItem, CategoryId, NewCategory, NewProduct, ProductId};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name accepted by the catalog.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Longest category name accepted by the catalog.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name(name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a category name: not blank, at most 100 characters.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_name(name, MAX_CATEGORY_NAME_LEN)
}

fn validate_name(name: &str, max: usize) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// Must be positive. Availability is the store's concern, not a fixed cap.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed.
///
/// ```rust
/// use storefront_core::Money;
/// use storefront_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a category identifier supplied by a caller.
pub fn validate_category_id(id: CategoryId) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "categoryId".to_string(),
        });
    }

    Ok(())
}

/// Validates a product identifier supplied by a caller.
pub fn validate_product_id(id: ProductId) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "productId".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a whole cart before checkout.
///
/// ## Rules
/// - At least one line
/// - Every product id and every quantity positive
///
/// Repeated product ids are allowed; each line is checked on its own.
pub fn validate_cart(items: &[CartItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for item in items {
        validate_product_id(item.product_id)?;
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

/// Validates catalog input for a new product.
///
/// Also used for full replacement on update. A category, when given, must
/// have a positive id; whether it exists is the store's call.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_price(product.price)?;
    validate_stock(product.stock)?;
    if let Some(category_id) = product.category_id {
        validate_category_id(category_id)?;
    }
    Ok(())
}

/// Validates catalog input for a category.
pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    validate_category_name(&category.name)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Kopi Susu").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_ok());
        assert!(validate_quantity(i64::MAX).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_cart() {
        assert!(validate_cart(&[CartItem::new(1, 1), CartItem::new(1, 2)]).is_ok());

        let err = validate_cart(&[]).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));

        assert!(validate_cart(&[CartItem::new(1, 0)]).is_err());
        assert!(validate_cart(&[CartItem::new(0, 1)]).is_err());
        assert!(validate_cart(&[CartItem::new(1, 1), CartItem::new(2, -3)]).is_err());
    }

    #[test]
    fn test_validate_cart_has_no_line_cap() {
        let large: Vec<CartItem> = (1..=250).map(|id| CartItem::new(id, 1)).collect();
        assert!(validate_cart(&large).is_ok());
    }

    #[test]
    fn test_validate_new_product() {
        let product = NewProduct {
            name: "Teh Botol".to_string(),
            price: Money::from_cents(500),
            stock: 10,
            category_id: Some(2),
        };
        assert!(validate_new_product(&product).is_ok());

        let uncategorized = NewProduct {
            category_id: None,
            ..product.clone()
        };
        assert!(validate_new_product(&uncategorized).is_ok());

        let bad_category = NewProduct {
            category_id: Some(0),
            ..product.clone()
        };
        assert!(validate_new_product(&bad_category).is_err());

        let negative_stock = NewProduct {
            stock: -1,
            ..product.clone()
        };
        assert!(validate_new_product(&negative_stock).is_err());

        let negative_price = NewProduct {
            price: Money::from_cents(-1),
            ..product
        };
        assert!(validate_new_product(&negative_price).is_err());
    }

    #[test]
    fn test_validate_new_category() {
        let category = NewCategory {
            name: "Minuman".to_string(),
            description: None,
        };
        assert!(validate_new_category(&category).is_ok());

        let blank = NewCategory {
            name: "   ".to_string(),
            description: Some("Tanpa nama".to_string()),
        };
        assert!(matches!(
            validate_new_category(&blank),
            Err(ValidationError::Required { .. })
        ));

        let long = NewCategory {
            name: "x".repeat(MAX_CATEGORY_NAME_LEN + 1),
            description: None,
        };
        assert!(matches!(
            validate_new_category(&long),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
    }
}

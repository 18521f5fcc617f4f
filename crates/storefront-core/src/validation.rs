//! # Validation Module
//!
//! Input validation for order, payment, and cart requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP layer (out of tree)                                     │
//! │  └── Deserialization, request shape                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rule validation before any storage access                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints (quantity > 0, status set)                      │
//! │  └── UNIQUE constraints (order_number)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::CreateOrderRequest;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted shipping/billing address.
pub const MAX_ADDRESS_LEN: usize = 500;

/// Longest accepted payment method label.
pub const MAX_PAYMENT_METHOD_LEN: usize = 50;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the number of lines in an order.
///
/// ## Rules
/// - At least one line
/// - At most MAX_ORDER_LINES (100)
pub fn validate_line_count(lines: usize) -> ValidationResult<()> {
    if lines == 0 {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if lines > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a shipping or billing address.
///
/// ## Rules
/// - Must not be blank
/// - At most MAX_ADDRESS_LEN characters
pub fn validate_address(field: &str, address: &str) -> ValidationResult<()> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if address.chars().count() > MAX_ADDRESS_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ADDRESS_LEN,
        });
    }

    Ok(())
}

/// Validates a payment method label and returns it trimmed.
///
/// The method is free-form ("card", "cod", "wallet", ...).
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_payment_method;
///
/// assert_eq!(validate_payment_method("  card ").unwrap(), "card");
/// assert!(validate_payment_method("").is_err());
/// ```
pub fn validate_payment_method(method: &str) -> ValidationResult<String> {
    let method = method.trim();

    if method.is_empty() {
        return Err(ValidationError::Required {
            field: "payment_method".to_string(),
        });
    }

    if method.chars().count() > MAX_PAYMENT_METHOD_LEN {
        return Err(ValidationError::TooLong {
            field: "payment_method".to_string(),
            max: MAX_PAYMENT_METHOD_LEN,
        });
    }

    Ok(method.to_string())
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates the shape of a checkout request (no catalog access).
pub fn validate_order_request(request: &CreateOrderRequest) -> ValidationResult<()> {
    validate_line_count(request.items.len())?;

    for line in &request.items {
        validate_quantity(line.quantity)?;
    }

    validate_address("shipping_address", &request.shipping_address)?;
    validate_address("billing_address", &request.billing_address)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderLineRequest;

    fn request(items: Vec<OrderLineRequest>) -> CreateOrderRequest {
        CreateOrderRequest {
            items,
            shipping_address: "1 Main St".to_string(),
            billing_address: "1 Main St".to_string(),
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_line_count() {
        assert!(matches!(
            validate_line_count(0),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_line_count(1).is_ok());
        assert!(validate_line_count(MAX_ORDER_LINES).is_ok());
        assert!(validate_line_count(MAX_ORDER_LINES + 1).is_err());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("shipping_address", "1 Main St").is_ok());
        assert!(validate_address("shipping_address", "   ").is_err());
        assert!(validate_address("shipping_address", &"x".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_payment_method() {
        assert_eq!(validate_payment_method("cod").unwrap(), "cod");
        assert!(validate_payment_method(&"m".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_order_request() {
        let ok = request(vec![OrderLineRequest {
            product_id: 1,
            quantity: 2,
        }]);
        assert!(validate_order_request(&ok).is_ok());

        assert!(validate_order_request(&request(vec![])).is_err());

        let zero_qty = request(vec![OrderLineRequest {
            product_id: 1,
            quantity: 0,
        }]);
        assert!(matches!(
            validate_order_request(&zero_qty),
            Err(ValidationError::MustBePositive { .. })
        ));

        let mut no_billing = ok.clone();
        no_billing.billing_address = String::new();
        assert_eq!(
            validate_order_request(&no_billing),
            Err(ValidationError::Required {
                field: "billing_address".to_string()
            })
        );
    }
}

//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  tally-core errors (this file)                                      │
//! │  ├── CoreError        - Checkout and domain rule failures           │
//! │  └── ValidationError  - Malformed input (zero/negative/duplicate)   │
//! │                                                                     │
//! │  Flow: ValidationError ──#[from]──► CoreError ──► caller            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, amounts, dates)
//! 3. Errors are enum variants, never String
//! 4. Every failure before the commit phase leaves state untouched

use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations surfaced synchronously;
/// there is no retry policy and no partial-success path.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A cart line references a SKU the catalog no longer carries.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds the product's live stock.
    ///
    /// Raised both at add-to-cart time and again at checkout, because stock
    /// may have moved between the two.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// A perishable product is past its expiration date.
    #[error("Product {sku} expired on {expired_on}")]
    Expired { sku: String, expired_on: NaiveDate },

    /// Checkout attempted on a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// The order total exceeds the customer's balance.
    #[error("Insufficient balance: need {required}, have {available}")]
    InsufficientBalance { required: Money, available: Money },

    /// Cart has exceeded maximum allowed distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when an argument doesn't meet requirements, and are checked
/// before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad SKU characters, non-finite weight).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate SKU in the catalog).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "CHEESE".to_string(),
            available: 1,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for CHEESE: available 1, requested 3"
        );

        let err = CoreError::InsufficientBalance {
            required: Money::from_minor(830),
            available: Money::from_minor(500),
        };
        assert_eq!(err.to_string(), "Insufficient balance: need 830, have 500");
    }

    #[test]
    fn test_expired_message_includes_date() {
        let err = CoreError::Expired {
            sku: "BISCUITS".to_string(),
            expired_on: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        };
        assert_eq!(err.to_string(), "Product BISCUITS expired on 2026-01-15");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

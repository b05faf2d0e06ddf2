//! # Error Types
//!
//! Domain-specific error types for promo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  promo-core errors (this file)                                         │
//! │  ├── CoreError        - Cart-level failures (fail the whole quote)     │
//! │  └── ValidationError  - A single field failed validation               │
//! │                                                                         │
//! │  quote-cli errors (app crate)                                          │
//! │  └── AppError         - Config, I/O and JSON failures                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → exit code              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed promotion rules are NOT errors: they are skipped and reported
//! as [`crate::matcher::SkippedRule`] so checkout is never blocked by a bad
//! rule.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart-level pricing failures.
///
/// Any of these aborts the quote: no partial rows are returned.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line item failed validation.
    ///
    /// `index` is the zero-based position of the item in the snapshot.
    #[error("Line item {index} ({sku}) is invalid: {source}")]
    InvalidLineItem {
        index: usize,
        sku: String,
        #[source]
        source: ValidationError,
    },

    /// The tax resolver has no rate for the item's tax class.
    #[error("Unknown tax class '{tax_class_id}' for line item {index}")]
    UnknownTaxClass { index: usize, tax_class_id: String },

    /// Cart has more line items than allowed.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error not tied to a single line item.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors. Each variant names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

    /// Invalid format or an arithmetic result that cannot be represented.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_error_names_field() {
        let err = CoreError::InvalidLineItem {
            index: 1,
            sku: "simple2".to_string(),
            source: ValidationError::MustBePositive {
                field: "quantity".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Line item 1 (simple2) is invalid: quantity must be positive"
        );
    }

    #[test]
    fn test_unknown_tax_class_message() {
        let err = CoreError::UnknownTaxClass {
            index: 0,
            tax_class_id: "luxury".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown tax class 'luxury' for line item 0");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "tax_class_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

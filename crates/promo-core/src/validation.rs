//! # Validation Module
//!
//! Input checks run before any pricing happens.
//!
//! ## Fail-Fast Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartSnapshot                                                           │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  validate_cart_size ──► too many items? → CoreError::CartTooLarge       │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  validate_line_item (each) ──► bad field? → CoreError::InvalidLineItem  │
//! │  validate_row_including_tax (each, once its rate is known)              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  validate_cart_sums ──► totals overflow? → CoreError::Validation        │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  pricing runs only when EVERY item is valid: no partial results         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Promotion rules are NOT validated here; bad rules are skipped by the
//! matcher instead of failing the cart.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, TaxMode, TaxRate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum SKU length accepted in a snapshot.
pub const MAX_SKU_LEN: usize = 64;

/// Validates a SKU.
///
/// ```rust
/// use promo_core::validation::validate_sku;
///
/// assert!(validate_sku("simple1").is_ok());
/// assert!(validate_sku("  ").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    Ok(())
}

/// Validates a quantity against the configured maximum.
///
/// ```rust
/// use promo_core::validation::validate_quantity;
///
/// assert!(validate_quantity(2, 999).is_ok());
/// assert!(validate_quantity(0, 999).is_err());
/// assert!(validate_quantity(-1, 999).is_err());
/// assert!(validate_quantity(1000, 999).is_err());
/// ```
pub fn validate_quantity(qty: i64, max: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > max {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max,
        });
    }

    Ok(())
}

/// Validates a unit price in cents. Zero is allowed (free items).
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates that a tax class id is present.
pub fn validate_tax_class_id(tax_class_id: &str) -> ValidationResult<()> {
    if tax_class_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "tax_class_id".to_string(),
        });
    }

    Ok(())
}

/// Validates a resolved tax rate (0% to 100%).
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates the number of line items in a cart.
pub fn validate_cart_size(items: usize, max: usize) -> ValidationResult<()> {
    if items > max {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: max as i64,
        });
    }

    Ok(())
}

/// Validates every field of a line item the engine depends on.
pub fn validate_line_item(item: &LineItem, max_quantity: i64) -> ValidationResult<()> {
    validate_sku(&item.sku)?;

    if item.product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    validate_unit_price_cents(item.unit_price.cents())?;
    validate_quantity(item.quantity, max_quantity)?;
    validate_tax_class_id(&item.tax_class_id)?;

    if item.unit_price.checked_multiply_quantity(item.quantity).is_none() {
        return Err(ValidationError::InvalidFormat {
            field: "row_total".to_string(),
            reason: "unit_price × quantity overflows".to_string(),
        });
    }

    Ok(())
}

/// Validates that a row's tax-inclusive total is representable and returns it.
///
/// Run after [`validate_line_item`] and [`validate_tax_rate`]: with the rate
/// capped at 100% the tax itself cannot overflow, only the sum can.
pub fn validate_row_including_tax(
    item: &LineItem,
    rate: TaxRate,
    mode: TaxMode,
) -> ValidationResult<Money> {
    let overflow = || ValidationError::InvalidFormat {
        field: "row_total_including_tax".to_string(),
        reason: "row total plus tax overflows".to_string(),
    };

    let row_total = item
        .unit_price
        .checked_multiply_quantity(item.quantity)
        .ok_or_else(overflow)?;

    match mode {
        TaxMode::Exclusive => row_total
            .checked_add(row_total.calculate_tax(rate))
            .ok_or_else(overflow),
        TaxMode::Inclusive => Ok(row_total),
    }
}

/// Validates that cart-wide sums are representable.
///
/// `rows_including_tax` holds the result of [`validate_row_including_tax`]
/// for each item. Every cart figure (subtotal, tax, discounts, grand total)
/// is bounded by their sum, so checking that sum is enough.
pub fn validate_cart_sums(items: &[LineItem], rows_including_tax: &[Money]) -> ValidationResult<()> {
    rows_including_tax
        .iter()
        .try_fold(Money::zero(), |sum, row| sum.checked_add(*row))
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "cart subtotal".to_string(),
            reason: "sum of row totals overflows".to_string(),
        })?;

    items
        .iter()
        .try_fold(0i64, |sum, item| sum.checked_add(item.quantity))
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "cart quantity".to_string(),
            reason: "sum of quantities overflows".to_string(),
        })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

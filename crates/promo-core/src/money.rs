//! # Money Module
//!
//! `Money`: integer cents plus the one rounding rule every price, tax and
//! discount in the engine goes through.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DISCOUNTS AND FLOATING POINT                                           │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    10.75 × 0.5 = 5.375 → round(5.375, 2) = 5.37 or 5.38?  ❌ DEPENDS!   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Basis Points                             │
//! │    1075 cents × 5000 bps = 5_375_000                                    │
//! │    (5_375_000 + 5000) / 10000 = 538 cents  ✅ ALWAYS $5.38              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use promo_core::money::Money;
//! use promo_core::types::Percentage;
//!
//! let row_total = Money::from_cents(2000); // $20.00
//! let half = row_total.percentage(Percentage::from_bps(5000));
//! assert_eq!(half.cents(), 1000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{Percentage, TaxRate};

/// Basis points in 100%.
pub const BPS_SCALE: i128 = 10_000;

/// Divides rounding half away from zero.
///
/// Every rounded figure in the engine goes through here, so a
/// `x.xx5` amount always lands on the larger cent.
fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        -((-numerator + half) / denominator)
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_price ──► RowTotal.row_total ──► Discount base          │
/// │                                │                      │                 │
/// │                                ▼                      ▼                 │
/// │                 row_total_including_tax      Discount.amount            │
/// │                                │                      │                 │
/// │                                └──────► CartTotals ◄──┘                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from dollars and cents.
    ///
    /// ```rust
    /// use promo_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 75).cents(), 1075);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Returns `None` on overflow so callers can report it instead of
    /// wrapping silently.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Adds, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiplies a unit price by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Takes a percentage of this amount, rounded half-up to the cent.
    ///
    /// ```rust
    /// use promo_core::money::Money;
    /// use promo_core::types::Percentage;
    ///
    /// // 50% of $10.75 = $5.375 → $5.38
    /// let amount = Money::from_cents(1075).percentage(Percentage::from_bps(5000));
    /// assert_eq!(amount.cents(), 538);
    /// ```
    pub fn percentage(&self, pct: Percentage) -> Money {
        let cents = div_round_half_up(self.0 as i128 * pct.bps() as i128, BPS_SCALE);
        Money(cents as i64)
    }

    /// Calculates the tax added on top of this (tax-exclusive) amount.
    ///
    /// ```rust
    /// use promo_core::money::Money;
    /// use promo_core::types::TaxRate;
    ///
    /// // $10.00 at 7.5% = $0.75
    /// let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(750));
    /// assert_eq!(tax.cents(), 75);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let cents = div_round_half_up(self.0 as i128 * rate.bps() as i128, BPS_SCALE);
        Money(cents as i64)
    }

    /// Extracts the tax already contained in a tax-inclusive amount.
    ///
    /// `net = round(gross × 10000 / (10000 + bps))`, tax is the difference,
    /// so `net + tax == gross` always holds.
    ///
    /// ```rust
    /// use promo_core::money::Money;
    /// use promo_core::types::TaxRate;
    ///
    /// let tax = Money::from_cents(1075).extract_included_tax(TaxRate::from_bps(750));
    /// assert_eq!(tax.cents(), 75);
    /// ```
    pub fn extract_included_tax(&self, rate: TaxRate) -> Money {
        let net = div_round_half_up(
            self.0 as i128 * BPS_SCALE,
            BPS_SCALE + rate.bps() as i128,
        );
        Money(self.0 - net as i64)
    }

    /// Subtracts, flooring the result at zero.
    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display (`$10.75`). Storefront formatting is done at the
/// boundary with its own currency settings.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1075)), "$10.75");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-538)), "-$5.38");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(100);

        assert_eq!((a + b).cents(), 1100);
        assert_eq!((a - b).cents(), 900);
        assert_eq!((a * 2).cents(), 2000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 1200);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 50% of $10.75 = $5.375 → $5.38
        let half = Money::from_cents(1075).percentage(Percentage::from_bps(5000));
        assert_eq!(half.cents(), 538);

        // 10% of $0.05 = $0.005 → $0.01
        let tenth = Money::from_cents(5).percentage(Percentage::from_bps(1000));
        assert_eq!(tenth.cents(), 1);

        // 10% of $0.04 = $0.004 → $0.00
        let tenth = Money::from_cents(4).percentage(Percentage::from_bps(1000));
        assert_eq!(tenth.cents(), 0);
    }

    #[test]
    fn test_negative_amounts_round_away_from_zero() {
        let refund = Money::from_cents(-1075).percentage(Percentage::from_bps(5000));
        assert_eq!(refund.cents(), -538);
    }

    #[test]
    fn test_tax_calculation() {
        // $10.00 at 7.5% = $0.75
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(750));
        assert_eq!(tax.cents(), 75);

        // $9.99 at 8.25% = $0.824175 → $0.82
        let tax = Money::from_cents(999).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 82);
    }

    #[test]
    fn test_extract_included_tax() {
        let rate = TaxRate::from_bps(2000); // 20% VAT
        let gross = Money::from_cents(1200);
        assert_eq!(gross.extract_included_tax(rate).cents(), 200);

        // Zero rate extracts nothing
        assert!(gross.extract_included_tax(TaxRate::zero()).is_zero());
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let base = Money::from_cents(500);
        assert_eq!(base.saturating_sub(Money::from_cents(200)).cents(), 300);
        assert_eq!(base.saturating_sub(Money::from_cents(900)).cents(), 0);
    }

    #[test]
    fn test_checked_multiply_quantity_overflow() {
        assert_eq!(
            Money::from_cents(1000).checked_multiply_quantity(2),
            Some(Money::from_cents(2000))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    }
}

//! # Cart Totals
//!
//! Sums priced rows into cart-level figures for the response boundary.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::aggregator::RowTotal;
use crate::money::Money;

/// Cart-level totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    /// Σ row_total.
    pub subtotal: Money,
    /// Σ row_total_including_tax.
    pub subtotal_including_tax: Money,
    pub tax_total: Money,
    /// Σ total_item_discount.
    pub discount_total: Money,
    /// Σ per-row discounted totals. Never negative.
    pub grand_total: Money,
}

impl CartTotals {
    pub fn from_rows(rows: &[RowTotal]) -> Self {
        rows.iter().fold(CartTotals::default(), |mut totals, row| {
            totals.item_count += 1;
            totals.total_quantity += row.quantity;
            totals.subtotal += row.row_total;
            totals.subtotal_including_tax += row.row_total_including_tax;
            totals.tax_total += row.tax_amount;
            totals.discount_total += row.total_item_discount;
            totals.grand_total += row.discounted_total();
            totals
        })
    }

    pub fn has_discounts(&self) -> bool {
        self.discount_total.is_positive()
    }
}

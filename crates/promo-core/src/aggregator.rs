//! # Line Item Aggregator
//!
//! Combines a line item, its ordered discounts and its tax rate into the
//! row figures exposed to callers.
//!
//! ```text
//! row_total               = unit_price × quantity       (never discounted)
//! row_total_including_tax = row_total + tax             (Exclusive)
//!                         = row_total                   (Inclusive)
//! total_item_discount     = Σ discounts[i].amount       (no re-rounding)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calculator::{Discount, DiscountBases};
use crate::money::Money;
use crate::types::{LineItem, TaxMode, TaxRate};

// =============================================================================
// Row Figures
// =============================================================================

/// Pre-discount figures for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFigures {
    pub row_total: Money,
    pub tax_amount: Money,
    pub row_total_including_tax: Money,
}

impl RowFigures {
    /// Computes row figures for `item` under `mode`.
    pub fn compute(item: &LineItem, rate: TaxRate, mode: TaxMode) -> Self {
        let row_total = item.row_total();
        match mode {
            TaxMode::Exclusive => {
                let tax_amount = row_total.calculate_tax(rate);
                RowFigures {
                    row_total,
                    tax_amount,
                    row_total_including_tax: row_total + tax_amount,
                }
            }
            TaxMode::Inclusive => RowFigures {
                row_total,
                tax_amount: row_total.extract_included_tax(rate),
                row_total_including_tax: row_total,
            },
        }
    }

    /// The figures discount rules are computed against.
    pub fn discount_bases(&self) -> DiscountBases {
        DiscountBases {
            pre_tax: self.row_total_including_tax - self.tax_amount,
            post_tax: self.row_total_including_tax,
        }
    }
}

// =============================================================================
// Row Total
// =============================================================================

/// Priced result for one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RowTotal {
    pub product_id: String,
    pub sku: String,
    pub quantity: i64,
    pub row_total: Money,
    pub row_total_including_tax: Money,
    pub tax_amount: Money,
    pub total_item_discount: Money,
    /// In rule evaluation order.
    pub discounts: Vec<Discount>,
}

impl RowTotal {
    /// What the customer pays for this row: tax-inclusive total minus
    /// discounts, never below zero.
    pub fn discounted_total(&self) -> Money {
        self.row_total_including_tax
            .saturating_sub(self.total_item_discount)
    }
}

/// Builds the [`RowTotal`] for `item`. Pure function of its inputs.
pub fn aggregate(item: &LineItem, discounts: Vec<Discount>, rate: TaxRate, mode: TaxMode) -> RowTotal {
    let figures = RowFigures::compute(item, rate, mode);
    let total_item_discount = discounts.iter().map(|d| d.amount).sum();

    RowTotal {
        product_id: item.product_id.clone(),
        sku: item.sku.clone(),
        quantity: item.quantity,
        row_total: figures.row_total,
        row_total_including_tax: figures.row_total_including_tax,
        tax_amount: figures.tax_amount,
        total_item_discount,
        discounts,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, qty: i64) -> LineItem {
        LineItem {
            product_id: "1".to_string(),
            sku: "simple1".to_string(),
            unit_price: Money::from_cents(price),
            quantity: qty,
            tax_class_id: "taxable".to_string(),
            category_ids: vec![],
        }
    }

    fn discount(rule_id: u32, cents: i64) -> Discount {
        Discount {
            rule_id,
            label: format!("Rule {}", rule_id),
            amount: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_exclusive_tax_row() {
        let row = aggregate(&item(1000, 1), vec![], TaxRate::from_bps(750), TaxMode::Exclusive);
        assert_eq!(row.row_total.cents(), 1000);
        assert_eq!(row.tax_amount.cents(), 75);
        assert_eq!(row.row_total_including_tax.cents(), 1075);
    }

    #[test]
    fn test_inclusive_tax_row() {
        let row = aggregate(&item(1075, 1), vec![], TaxRate::from_bps(750), TaxMode::Inclusive);
        assert_eq!(row.row_total.cents(), 1075);
        assert_eq!(row.row_total_including_tax.cents(), 1075);
        assert_eq!(row.tax_amount.cents(), 75);

        let bases = RowFigures::compute(&item(1075, 1), TaxRate::from_bps(750), TaxMode::Inclusive)
            .discount_bases();
        assert_eq!(bases.pre_tax.cents(), 1000);
        assert_eq!(bases.post_tax.cents(), 1075);
    }

    #[test]
    fn test_discounts_summed_in_order_without_touching_row_total() {
        let discounts = vec![discount(1, 1000), discount(2, 100)];
        let row = aggregate(&item(1000, 2), discounts, TaxRate::zero(), TaxMode::Exclusive);

        assert_eq!(row.row_total.cents(), 2000);
        assert_eq!(row.total_item_discount.cents(), 1100);
        assert_eq!(
            row.discounts.iter().map(|d| d.rule_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(row.discounted_total().cents(), 900);
    }

    #[test]
    fn test_no_discounts() {
        let row = aggregate(&item(1000, 2), vec![], TaxRate::zero(), TaxMode::Exclusive);
        assert!(row.total_item_discount.is_zero());
        assert!(row.discounts.is_empty());
        assert_eq!(row.row_total.cents(), 2000);
    }
}

//! # Discount Calculator
//!
//! Turns the matcher's ordered rules into an ordered list of discounts for
//! one line item.
//!
//! ## Evaluation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for rule in matched (priority order):                                  │
//! │                                                                         │
//! │    base      = pre_tax | post_tax          (rule.tax_treatment)         │
//! │    remaining = base - discounted so far    (never below zero)           │
//! │                                                                         │
//! │    Percentage  → round(of × pct)  where `of` is                         │
//! │                  RowTotal: base │ PriorDiscount: last amount │          │
//! │                  Remainder: remaining                                   │
//! │    FixedAmount → amount × quantity                                      │
//! │    PerLine     → amount                                                 │
//! │                                                                         │
//! │    amount = min(candidate, remaining)      clamp                        │
//! │    stop_further_rules? → break                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each amount is rounded once, when it is computed. Totals are exact sums
//! of those rounded amounts.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::money::Money;
use crate::rule::{DiscountTaxTreatment, PercentageBase, PromotionRule, RuleKind};
use crate::types::LineItem;

// =============================================================================
// Discount
// =============================================================================

/// A monetary reduction attributed to one rule.
///
/// `label` is the rule's store label as authored; display suffixes are
/// added at the response boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Discount {
    pub rule_id: u32,
    pub label: String,
    pub amount: Money,
}

// =============================================================================
// Discount Bases
// =============================================================================

/// The two figures a rule can discount against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountBases {
    /// Row total excluding tax.
    pub pre_tax: Money,
    /// Row total including tax.
    pub post_tax: Money,
}

impl DiscountBases {
    /// Bases for a row that carries no tax.
    pub fn untaxed(row_total: Money) -> Self {
        DiscountBases {
            pre_tax: row_total,
            post_tax: row_total,
        }
    }

    pub fn for_treatment(&self, treatment: DiscountTaxTreatment) -> Money {
        match treatment {
            DiscountTaxTreatment::PreTax => self.pre_tax,
            DiscountTaxTreatment::PostTax => self.post_tax,
        }
    }
}

// =============================================================================
// Calculation
// =============================================================================

fn candidate_amount(
    rule: &PromotionRule,
    item: &LineItem,
    base: Money,
    remaining: Money,
    prior: Option<Money>,
) -> Money {
    match rule.kind {
        RuleKind::Percentage { percent } => {
            let of = match rule.percentage_base {
                PercentageBase::RowTotal => base,
                PercentageBase::PriorDiscount => prior.unwrap_or(base),
                PercentageBase::Remainder => remaining,
            };
            of.percentage(percent)
        }
        RuleKind::FixedAmount { amount } => amount
            .checked_multiply_quantity(item.quantity)
            .unwrap_or(Money::from_cents(i64::MAX)),
        RuleKind::FixedAmountPerLine { amount } => amount,
    }
}

/// Applies `matched` rules to `item` in order.
///
/// Zero-amount results are not recorded, but a zero-amount rule with
/// `stop_further_rules` still stops evaluation.
///
/// ## Example
/// ```rust
/// use promo_core::calculator::{apply_rules, DiscountBases};
/// use promo_core::money::Money;
/// use promo_core::rule::PromotionRule;
/// use promo_core::types::LineItem;
///
/// let item = LineItem {
///     product_id: "1".into(),
///     sku: "simple1".into(),
///     unit_price: Money::from_cents(1000),
///     quantity: 2,
///     tax_class_id: "taxable".into(),
///     category_ids: vec![66],
/// };
/// let rule = PromotionRule::percentage(1, "TestRule", 5000);
///
/// let discounts = apply_rules(&item, DiscountBases::untaxed(item.row_total()), &[&rule]);
/// assert_eq!(discounts[0].amount, Money::from_cents(1000));
/// ```
pub fn apply_rules(
    item: &LineItem,
    bases: DiscountBases,
    matched: &[&PromotionRule],
) -> Vec<Discount> {
    let mut discounts = Vec::with_capacity(matched.len());
    let mut discounted = Money::zero();
    let mut prior: Option<Money> = None;

    for rule in matched {
        let base = bases.for_treatment(rule.tax_treatment);
        let remaining = base.saturating_sub(discounted);
        let amount = candidate_amount(rule, item, base, remaining, prior)
            .min(remaining)
            .max(Money::zero());

        debug!(
            rule_id = rule.id,
            sku = %item.sku,
            %base,
            %amount,
            "Rule applied"
        );

        if amount.is_positive() {
            discounted += amount;
            prior = Some(amount);
            discounts.push(Discount {
                rule_id: rule.id,
                label: rule.label.clone(),
                amount,
            });
        }

        if rule.stop_further_rules {
            break;
        }
    }

    discounts
}

// =============================================================================
// Unit Tests
// =============================================================================

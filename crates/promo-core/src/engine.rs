//! # Pricing Engine
//!
//! Entry points that wire the matcher, calculator and aggregator together
//! for a whole cart.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartSnapshot + rules + TaxRateResolver + now                          │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  validate every item, resolve every tax rate   (fail fast)             │
//! │  check cart sums for overflow                                           │
//! │      │                                                                  │
//! │      ▼  once per cart                                                   │
//! │  screen_rules ──► SkippedRule (malformed)                               │
//! │      │                                                                  │
//! │      ▼  per item, in input order                                        │
//! │  match_screened ──► apply_rules ──► aggregate ──► RowTotal              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  CartTotals::from_rows ──► CartQuote                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here holds state between calls. Quoting the same snapshot twice
//! gives the same result, and separate carts can be quoted in parallel
//! against a shared rule set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::{aggregate, RowFigures, RowTotal};
use crate::calculator::apply_rules;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::matcher::{match_screened, screen_rules, CartContext, SkippedRule};
use crate::rule::PromotionRule;
use crate::tax::TaxRateResolver;
use crate::totals::CartTotals;
use crate::types::{CartSnapshot, TaxMode, TaxRate};
use crate::validation::{
    validate_cart_size, validate_cart_sums, validate_line_item, validate_row_including_tax,
    validate_tax_rate,
};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Knobs the surrounding service configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Whether catalog prices include tax.
    pub tax_mode: TaxMode,
    pub max_cart_items: usize,
    pub max_item_quantity: i64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            tax_mode: TaxMode::Exclusive,
            max_cart_items: MAX_CART_ITEMS,
            max_item_quantity: MAX_ITEM_QUANTITY,
        }
    }
}

/// Everything computed for one cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartQuote {
    /// One row per line item, in input order.
    pub rows: Vec<RowTotal>,
    pub totals: CartTotals,
    /// Malformed rules that were ignored, once per rule.
    pub skipped_rules: Vec<SkippedRule>,
}

/// Validates the cart and resolves one tax rate per item.
fn resolve_rates<R>(
    cart: &CartSnapshot,
    resolver: &R,
    options: &EngineOptions,
) -> CoreResult<Vec<TaxRate>>
where
    R: TaxRateResolver + ?Sized,
{
    validate_cart_size(cart.items.len(), options.max_cart_items).map_err(|_| {
        CoreError::CartTooLarge {
            max: options.max_cart_items,
        }
    })?;

    let priced: Vec<(TaxRate, Money)> = cart
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| -> CoreResult<(TaxRate, Money)> {
            let invalid = |source| CoreError::InvalidLineItem {
                index,
                sku: item.sku.clone(),
                source,
            };

            validate_line_item(item, options.max_item_quantity).map_err(invalid)?;

            let rate = resolver
                .resolve(&item.tax_class_id, cart.destination.as_ref())
                .ok_or_else(|| CoreError::UnknownTaxClass {
                    index,
                    tax_class_id: item.tax_class_id.clone(),
                })?;
            validate_tax_rate(rate).map_err(invalid)?;
            let including_tax =
                validate_row_including_tax(item, rate, options.tax_mode).map_err(invalid)?;

            Ok((rate, including_tax))
        })
        .collect::<CoreResult<_>>()?;

    let rows_including_tax: Vec<Money> = priced.iter().map(|(_, row)| *row).collect();
    validate_cart_sums(&cart.items, &rows_including_tax)?;

    Ok(priced.into_iter().map(|(rate, _)| rate).collect())
}

/// Prices every line item and assembles cart totals.
///
/// ## Errors
/// - [`CoreError::CartTooLarge`] when the cart exceeds `max_cart_items`
/// - [`CoreError::InvalidLineItem`] for the first invalid item
/// - [`CoreError::UnknownTaxClass`] when the resolver has no rate
/// - [`CoreError::Validation`] when cart-wide sums would overflow
pub fn quote_cart<R>(
    cart: &CartSnapshot,
    rules: &[PromotionRule],
    resolver: &R,
    now: DateTime<Utc>,
    options: &EngineOptions,
) -> CoreResult<CartQuote>
where
    R: TaxRateResolver + ?Sized,
{
    let rates = resolve_rates(cart, resolver, options)?;
    let ctx = CartContext::from_cart(cart, now);

    let screened = screen_rules(rules);
    let skipped_rules: Vec<SkippedRule> = screened.skipped;
    let mut rows = Vec::with_capacity(cart.items.len());

    for (item, rate) in cart.items.iter().zip(rates) {
        let matched = match_screened(item, &ctx, &screened.valid);
        let bases = RowFigures::compute(item, rate, options.tax_mode).discount_bases();
        let discounts = apply_rules(item, bases, &matched);
        rows.push(aggregate(item, discounts, rate, options.tax_mode));
    }

    let totals = CartTotals::from_rows(&rows);
    info!(
        cart_id = %cart.cart_id,
        items = totals.item_count,
        subtotal = %totals.subtotal,
        discount = %totals.discount_total,
        skipped = skipped_rules.len(),
        "Cart quoted"
    );

    Ok(CartQuote {
        rows,
        totals,
        skipped_rules,
    })
}

/// Prices every line item, preserving input order.
pub fn compute_row_totals<R>(
    cart: &CartSnapshot,
    rules: &[PromotionRule],
    resolver: &R,
    now: DateTime<Utc>,
    options: &EngineOptions,
) -> CoreResult<Vec<RowTotal>>
where
    R: TaxRateResolver + ?Sized,
{
    quote_cart(cart, rules, resolver, now, options).map(|quote| quote.rows)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Money;
    use crate::rule::RuleCondition;
    use crate::tax::TaxTable;
    use crate::types::LineItem;

    fn line(sku: &str, price: i64, qty: i64, tax_class: &str) -> LineItem {
        LineItem {
            product_id: sku.to_string(),
            sku: sku.to_string(),
            unit_price: Money::from_cents(price),
            quantity: qty,
            tax_class_id: tax_class.to_string(),
            category_ids: vec![66],
        }
    }

    fn table() -> TaxTable {
        TaxTable::new().with_class("taxable", TaxRate::zero())
    }

    #[test]
    fn test_rows_follow_input_order() {
        let mut cart = CartSnapshot::new();
        cart.items.push(line("b", 2000, 1, "taxable"));
        cart.items.push(line("a", 1000, 1, "taxable"));

        let rows =
            compute_row_totals(&cart, &[], &table(), Utc::now(), &EngineOptions::default()).unwrap();
        let skus: Vec<_> = rows.iter().map(|r| r.sku.as_str()).collect();
        assert_eq!(skus, vec!["b", "a"]);
    }

    #[test]
    fn test_invalid_item_fails_whole_cart() {
        let mut cart = CartSnapshot::new();
        cart.items.push(line("a", 1000, 1, "taxable"));
        cart.items.push(line("b", 1000, 0, "taxable"));

        let err = quote_cart(&cart, &[], &table(), Utc::now(), &EngineOptions::default())
            .unwrap_err();
        match err {
            CoreError::InvalidLineItem { index, source, .. } => {
                assert_eq!(index, 1);
                assert!(matches!(source, ValidationError::MustBePositive { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_tax_class() {
        let mut cart = CartSnapshot::new();
        cart.items.push(line("a", 1000, 1, "luxury"));

        let err = quote_cart(&cart, &[], &table(), Utc::now(), &EngineOptions::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownTaxClass { index: 0, .. }));
    }

    #[test]
    fn test_cart_too_large() {
        let mut cart = CartSnapshot::new();
        for i in 0..3 {
            cart.items.push(line(&format!("sku{i}"), 100, 1, "taxable"));
        }
        let options = EngineOptions {
            max_cart_items: 2,
            ..EngineOptions::default()
        };

        let err = quote_cart(&cart, &[], &table(), Utc::now(), &options).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { max: 2 }));
    }

    #[test]
    fn test_skipped_rules_reported_once() {
        let mut cart = CartSnapshot::new();
        cart.items.push(line("a", 1000, 1, "taxable"));
        cart.items.push(line("b", 1000, 1, "taxable"));
        let rules = vec![PromotionRule::percentage(1, "Broken", 1000)
            .with_condition(RuleCondition::MinSubtotal { threshold: None })];

        let quote =
            quote_cart(&cart, &rules, &table(), Utc::now(), &EngineOptions::default()).unwrap();
        assert_eq!(quote.skipped_rules.len(), 1);
        assert!(quote.totals.discount_total.is_zero());
    }

    #[test]
    fn test_cart_sum_overflow_rejected() {
        let mut cart = CartSnapshot::new();
        for sku in ["a", "b", "c"] {
            cart.items.push(line(sku, i64::MAX / 2, 1, "taxable"));
        }

        let err = compute_row_totals(&cart, &[], &table(), Utc::now(), &EngineOptions::default())
            .unwrap_err();
        match err {
            CoreError::Validation(ValidationError::InvalidFormat { field, .. }) => {
                assert_eq!(field, "cart subtotal");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_two_half_max_rows_overflow_once_taxed() {
        let mut cart = CartSnapshot::new();
        cart.items.push(line("a", i64::MAX / 2, 1, "taxable"));
        cart.items.push(line("b", i64::MAX / 2, 1, "taxable"));

        // Untaxed the sum still fits
        assert!(quote_cart(&cart, &[], &table(), Utc::now(), &EngineOptions::default()).is_ok());

        let taxed = TaxTable::new().with_class("taxable", TaxRate::from_bps(750));
        let err = quote_cart(&cart, &[], &taxed, Utc::now(), &EngineOptions::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_row_plus_tax_overflow_rejected() {
        let mut cart = CartSnapshot::new();
        cart.items.push(line("a", i64::MAX - 10, 1, "taxable"));
        let taxed = TaxTable::new().with_class("taxable", TaxRate::from_bps(750));

        let err = quote_cart(&cart, &[], &taxed, Utc::now(), &EngineOptions::default())
            .unwrap_err();
        match err {
            CoreError::InvalidLineItem { index, source, .. } => {
                assert_eq!(index, 0);
                assert!(matches!(
                    source,
                    ValidationError::InvalidFormat { ref field, .. } if field == "row_total_including_tax"
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! # Storefront Response Adapter
//!
//! Converts a [`CartQuote`] into the storefront's cart prices shape:
//!
//! ```text
//! items[] {
//!   sku, quantity
//!   prices {
//!     row_total               { value }
//!     row_total_including_tax { value }
//!     total_item_discount     { value }
//!     discounts[]             { amount { value }, label }
//!   }
//! }
//! ```
//!
//! This is the only place the configured label suffix is applied and the
//! only place money becomes a decimal `value`.

use std::fmt;

use promo_core::engine::CartQuote;
use promo_core::{CartTotals, Discount, Money, RowTotal};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::QuoteConfig;

/// A decimal money amount in major units (`10.75`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MoneyValue {
    pub value: f64,
}

impl From<Money> for MoneyValue {
    fn from(amount: Money) -> Self {
        MoneyValue {
            value: amount.cents() as f64 / 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountView {
    pub amount: MoneyValue,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemPrices {
    pub row_total: MoneyValue,
    pub row_total_including_tax: MoneyValue,
    pub total_item_discount: MoneyValue,
    pub discounts: Vec<DiscountView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItemView {
    pub sku: String,
    pub quantity: i64,
    pub prices: ItemPrices,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartPrices {
    pub subtotal_excluding_tax: MoneyValue,
    pub subtotal_including_tax: MoneyValue,
    pub tax_total: MoneyValue,
    pub discount_total: MoneyValue,
    pub grand_total: MoneyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SkippedRuleView {
    pub rule_id: u32,
    pub reason: String,
}

/// Full response for one quoted cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartPricesResponse {
    pub cart_id: String,
    pub items: Vec<CartItemView>,
    pub prices: CartPrices,
    /// Present only when a malformed rule was ignored.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_rules: Vec<SkippedRuleView>,
}

impl CartPricesResponse {
    pub fn from_quote(cart_id: impl Into<String>, quote: &CartQuote, label_suffix: &str) -> Self {
        CartPricesResponse {
            cart_id: cart_id.into(),
            items: quote
                .rows
                .iter()
                .map(|row| item_view(row, label_suffix))
                .collect(),
            prices: totals_view(&quote.totals),
            skipped_rules: quote
                .skipped_rules
                .iter()
                .map(|skipped| SkippedRuleView {
                    rule_id: skipped.rule_id,
                    reason: skipped.reason.clone(),
                })
                .collect(),
        }
    }
}

fn discount_view(discount: &Discount, label_suffix: &str) -> DiscountView {
    DiscountView {
        amount: discount.amount.into(),
        label: format!("{}{}", discount.label, label_suffix),
    }
}

fn item_view(row: &RowTotal, label_suffix: &str) -> CartItemView {
    CartItemView {
        sku: row.sku.clone(),
        quantity: row.quantity,
        prices: ItemPrices {
            row_total: row.row_total.into(),
            row_total_including_tax: row.row_total_including_tax.into(),
            total_item_discount: row.total_item_discount.into(),
            discounts: row
                .discounts
                .iter()
                .map(|d| discount_view(d, label_suffix))
                .collect(),
        },
    }
}

fn totals_view(totals: &CartTotals) -> CartPrices {
    CartPrices {
        subtotal_excluding_tax: totals.subtotal.into(),
        subtotal_including_tax: totals.subtotal_including_tax.into(),
        tax_total: totals.tax_total.into(),
        discount_total: totals.discount_total.into(),
        grand_total: totals.grand_total.into(),
    }
}

/// Plain-text receipt of a quote for terminal use.
///
/// ```text
/// simple1 x1  $10.00  (incl. tax $10.75)
///     TestRule_Label  -$5.38
/// Subtotal:   $10.00
/// Tax:        $0.75
/// Discounts: -$5.38
/// Total:      $5.37
/// ```
pub struct Receipt<'a> {
    quote: &'a CartQuote,
    config: &'a QuoteConfig,
}

impl<'a> Receipt<'a> {
    pub fn new(quote: &'a CartQuote, config: &'a QuoteConfig) -> Self {
        Receipt { quote, config }
    }
}

impl fmt::Display for Receipt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let money = |amount: Money| self.config.format_money(amount);

        for row in &self.quote.rows {
            writeln!(
                f,
                "{} x{}  {}  (incl. tax {})",
                row.sku,
                row.quantity,
                money(row.row_total),
                money(row.row_total_including_tax)
            )?;
            for discount in &row.discounts {
                writeln!(
                    f,
                    "    {}{}  -{}",
                    discount.label,
                    self.config.label_suffix,
                    money(discount.amount)
                )?;
            }
        }

        let totals = &self.quote.totals;
        writeln!(f, "Subtotal:   {}", money(totals.subtotal))?;
        writeln!(f, "Tax:        {}", money(totals.tax_total))?;
        if totals.has_discounts() {
            writeln!(f, "Discounts: -{}", money(totals.discount_total))?;
        }
        writeln!(f, "Total:      {}", money(totals.grand_total))?;

        for skipped in &self.quote.skipped_rules {
            writeln!(f, "Skipped rule {}: {}", skipped.rule_id, skipped.reason)?;
        }

        Ok(())
    }
}

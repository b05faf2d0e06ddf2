//! # promo-core: Pure Promotion & Pricing Logic
//!
//! Computes per-item row totals, tax-inclusive totals and ordered discount
//! breakdowns for a cart snapshot against a set of cart price rules.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Promo Engine Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        API boundary (quote-cli / storefront service)            │   │
//! │  │  loads cart, rules, tax table ──► formats labels & JSON        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ promo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐   ┌────────────┐   ┌────────────┐   ┌────────┐  │   │
//! │  │   │ matcher  │──►│ calculator │──►│ aggregator │──►│ totals │  │   │
//! │  │   │  rules   │   │ discounts  │   │  RowTotal  │   │  cart  │  │   │
//! │  │   └──────────┘   └────────────┘   └────────────┘   └────────┘  │   │
//! │  │        ▲                                ▲                       │   │
//! │  │        │ rule                           │ tax                   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK READS • NO GLOBAL REGISTRY                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent `Money` with half-up percentage rounding
//! - [`types`] - Cart snapshot, line items, tax rates
//! - [`rule`] - Promotion rule model
//! - [`matcher`] - Rule Matcher
//! - [`calculator`] - Discount Calculator
//! - [`aggregator`] - Line Item Aggregator
//! - [`totals`] - Cart Totals Assembler
//! - [`tax`] - Injected tax rate resolution
//! - [`engine`] - Whole-cart entry points
//! - [`validation`], [`error`]
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use promo_core::engine::{compute_row_totals, EngineOptions};
//! use promo_core::rule::{PromotionRule, RuleCondition};
//! use promo_core::tax::TaxTable;
//! use promo_core::{CartSnapshot, LineItem, Money, TaxRate};
//!
//! let mut cart = CartSnapshot::new();
//! cart.items.push(LineItem {
//!     product_id: "1".into(),
//!     sku: "simple1".into(),
//!     unit_price: Money::from_cents(1000),
//!     quantity: 2,
//!     tax_class_id: "taxable".into(),
//!     category_ids: vec![66],
//! });
//!
//! let rules = vec![PromotionRule::percentage(1, "TestRule", 5000)
//!     .with_condition(RuleCondition::InCategory { category_ids: vec![66] })];
//! let taxes = TaxTable::new().with_class("taxable", TaxRate::zero());
//!
//! let rows = compute_row_totals(&cart, &rules, &taxes, Utc::now(), &EngineOptions::default())?;
//! assert_eq!(rows[0].row_total.cents(), 2000);
//! assert_eq!(rows[0].total_item_discount.cents(), 1000);
//! # Ok::<(), promo_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregator;
pub mod calculator;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod money;
pub mod rule;
pub mod tax;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregator::RowTotal;
pub use calculator::Discount;
pub use engine::{compute_row_totals, quote_cart, CartQuote, EngineOptions};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use rule::PromotionRule;
pub use tax::{TaxRateResolver, TaxTable};
pub use totals::CartTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default maximum line items in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Default maximum quantity of a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 999;

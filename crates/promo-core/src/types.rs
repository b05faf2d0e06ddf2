//! # Domain Types
//!
//! Cart-side types consumed by the pricing engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CartSnapshot   │   │    LineItem     │   │   Destination   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  cart_id (UUID) │──►│  product_id     │   │  country_code   │       │
//! │  │  items          │   │  unit_price     │   │  region         │       │
//! │  │  destination    │   │  quantity       │   │  postcode       │       │
//! │  └─────────────────┘   │  tax_class_id   │   └─────────────────┘       │
//! │                        │  category_ids   │                              │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   Percentage    │   │    TaxMode      │       │
//! │  │  bps (u32)      │   │  bps (u32)      │   │  Exclusive      │       │
//! │  │  750 = 7.5%     │   │  5000 = 50%     │   │  Inclusive      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Snapshots are immutable inputs. Catalog lookups (price, tax class,
//! category assignment) happen before the engine is called.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 750 bps = 7.5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Percentage
// =============================================================================

/// A discount percentage in basis points (5000 = 50%).
///
/// Kept separate from [`TaxRate`] so a tax rate can never be passed where a
/// discount is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// 100% in basis points.
    pub const FULL_BPS: u32 = 10_000;

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Tax Mode
// =============================================================================

/// Whether catalog prices already include tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Price + tax shown separately (US model).
    #[default]
    Exclusive,
    /// Price includes tax (EU/UK model).
    Inclusive,
}

// =============================================================================
// Destination
// =============================================================================

/// Shipping destination used for tax rate resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// ISO 3166-1 alpha-2 country code ("US").
    pub country_code: String,

    /// Region code within the country ("AL").
    pub region: Option<String>,

    pub postcode: Option<String>,
}

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in a cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,

    /// Business identifier, carried through for logging and responses.
    pub sku: String,

    /// Resolved unit price (special price when one applies).
    pub unit_price: Money,

    pub quantity: i64,

    pub tax_class_id: String,

    /// Categories the product is assigned to.
    #[serde(default)]
    pub category_ids: Vec<u32>,
}

impl LineItem {
    /// `unit_price × quantity`, before any discount.
    #[inline]
    pub fn row_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    pub fn in_any_category(&self, category_ids: &[u32]) -> bool {
        self.category_ids.iter().any(|id| category_ids.contains(id))
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// An immutable view of a cart at quote time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub cart_id: Uuid,

    /// Line items in display order. Output rows follow this order.
    pub items: Vec<LineItem>,

    /// Absent until a shipping address is set on the cart.
    #[serde(default)]
    pub destination: Option<Destination>,
}

impl CartSnapshot {
    /// Creates an empty cart with a fresh ID.
    pub fn new() -> Self {
        CartSnapshot {
            cart_id: Uuid::new_v4(),
            items: Vec::new(),
            destination: None,
        }
    }

    /// Total quantity across all line items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of row totals, before discounts.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::row_total).sum()
    }
}

impl Default for CartSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, qty: i64, categories: &[u32]) -> LineItem {
        LineItem {
            product_id: "p1".to_string(),
            sku: "simple1".to_string(),
            unit_price: Money::from_cents(price),
            quantity: qty,
            tax_class_id: "taxable".to_string(),
            category_ids: categories.to_vec(),
        }
    }

    #[test]
    fn test_row_total() {
        assert_eq!(item(1000, 2, &[]).row_total().cents(), 2000);
    }

    #[test]
    fn test_category_membership() {
        let line = item(1000, 1, &[3, 66]);
        assert!(line.in_any_category(&[66]));
        assert!(line.in_any_category(&[1, 3]));
        assert!(!line.in_any_category(&[7]));
        assert!(!line.in_any_category(&[]));
    }

    #[test]
    fn test_cart_aggregates() {
        let mut cart = CartSnapshot::new();
        cart.items.push(item(1000, 2, &[]));
        cart.items.push(item(2000, 2, &[]));

        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(cart.subtotal().cents(), 6000);
    }

    #[test]
    fn test_tax_mode_default() {
        assert_eq!(TaxMode::default(), TaxMode::Exclusive);
    }

    #[test]
    fn test_line_item_deserializes_without_categories() {
        let json = r#"{
            "product_id": "p1",
            "sku": "simple1",
            "unit_price": 1000,
            "quantity": 2,
            "tax_class_id": "taxable"
        }"#;
        let line: LineItem = serde_json::from_str(json).unwrap();
        assert!(line.category_ids.is_empty());
        assert_eq!(line.row_total().cents(), 2000);
    }
}

//! # Tax Rate Resolution
//!
//! The engine never looks tax rates up itself. Callers inject a
//! [`TaxRateResolver`]; rates are expected to be fetched ahead of time.
//!
//! ```text
//! (tax_class_id, destination) ──► TaxRateResolver ──► Some(rate) | None
//!                                                          │
//!                                             None = unknown tax class
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Destination, TaxRate};

/// Resolves the tax rate for a product tax class shipped to a destination.
pub trait TaxRateResolver {
    /// Returns `None` when the tax class is unknown.
    fn resolve(&self, tax_class_id: &str, destination: Option<&Destination>) -> Option<TaxRate>;
}

impl<F> TaxRateResolver for F
where
    F: Fn(&str, Option<&Destination>) -> Option<TaxRate>,
{
    fn resolve(&self, tax_class_id: &str, destination: Option<&Destination>) -> Option<TaxRate> {
        self(tax_class_id, destination)
    }
}

// =============================================================================
// In-Memory Tax Table
// =============================================================================

/// A rate override for a country, optionally narrowed to one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalRate {
    pub country_code: String,
    #[serde(default)]
    pub region: Option<String>,
    pub rate: TaxRate,
}

impl RegionalRate {
    /// 2 = country and region match, 1 = country-wide match, None = no match.
    fn specificity(&self, destination: &Destination) -> Option<u8> {
        if !self.country_code.eq_ignore_ascii_case(&destination.country_code) {
            return None;
        }
        match (&self.region, &destination.region) {
            (None, _) => Some(1),
            (Some(want), Some(have)) if want.eq_ignore_ascii_case(have) => Some(2),
            _ => None,
        }
    }
}

/// Rates for one product tax class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxClassRates {
    pub tax_class_id: String,

    /// Used when no regional rate matches, or the cart has no destination.
    #[serde(default)]
    pub default_rate: TaxRate,

    #[serde(default)]
    pub regional: Vec<RegionalRate>,
}

/// A pre-fetched tax table.
///
/// ## Example
/// ```rust
/// use promo_core::tax::{TaxRateResolver, TaxTable};
/// use promo_core::types::{Destination, TaxRate};
///
/// let table = TaxTable::new()
///     .with_class("taxable", TaxRate::zero())
///     .with_regional_rate("taxable", "US", Some("AL"), TaxRate::from_bps(750));
///
/// let alabama = Destination {
///     country_code: "US".into(),
///     region: Some("AL".into()),
///     postcode: Some("36043".into()),
/// };
/// assert_eq!(table.resolve("taxable", Some(&alabama)), Some(TaxRate::from_bps(750)));
/// assert_eq!(table.resolve("taxable", None), Some(TaxRate::zero()));
/// assert_eq!(table.resolve("unknown", None), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    #[serde(default)]
    pub classes: Vec<TaxClassRates>,
}

impl TaxTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tax class (or replaces its default rate).
    pub fn with_class(mut self, tax_class_id: &str, default_rate: TaxRate) -> Self {
        match self.class_mut(tax_class_id) {
            Some(class) => class.default_rate = default_rate,
            None => self.classes.push(TaxClassRates {
                tax_class_id: tax_class_id.to_string(),
                default_rate,
                regional: Vec::new(),
            }),
        }
        self
    }

    /// Adds a regional rate, creating the class with a zero default if needed.
    pub fn with_regional_rate(
        mut self,
        tax_class_id: &str,
        country_code: &str,
        region: Option<&str>,
        rate: TaxRate,
    ) -> Self {
        if self.class_mut(tax_class_id).is_none() {
            self = self.with_class(tax_class_id, TaxRate::zero());
        }
        if let Some(class) = self.class_mut(tax_class_id) {
            class.regional.push(RegionalRate {
                country_code: country_code.to_string(),
                region: region.map(str::to_string),
                rate,
            });
        }
        self
    }

    fn class_mut(&mut self, tax_class_id: &str) -> Option<&mut TaxClassRates> {
        self.classes
            .iter_mut()
            .find(|c| c.tax_class_id == tax_class_id)
    }
}

impl TaxRateResolver for TaxTable {
    fn resolve(&self, tax_class_id: &str, destination: Option<&Destination>) -> Option<TaxRate> {
        let class = self
            .classes
            .iter()
            .find(|c| c.tax_class_id == tax_class_id)?;

        let regional = destination.and_then(|dest| {
            class
                .regional
                .iter()
                .filter_map(|r| r.specificity(dest).map(|score| (score, r.rate)))
                .max_by_key(|(score, _)| *score)
                .map(|(_, rate)| rate)
        });

        Some(regional.unwrap_or(class.default_rate))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Promotion Rules
//!
//! The rule model the matcher and calculator work from. Rules are authored
//! and stored elsewhere; the engine only reads an immutable snapshot.
//!
//! ## Rule Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PromotionRule                                                          │
//! │  ├── id, label, priority          ordering + display                   │
//! │  ├── is_active, valid_from/to     status + validity window             │
//! │  ├── conditions[]                 ALL must hold (category, qty, total) │
//! │  ├── kind                         Percentage | FixedAmount[PerLine]    │
//! │  ├── tax_treatment                PreTax | PostTax discount base       │
//! │  ├── percentage_base              RowTotal | PriorDiscount | Remainder │
//! │  └── stop_further_rules           later rules skipped for the item     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Percentage;

/// Maximum length of a rule's store label.
pub const MAX_LABEL_LEN: usize = 255;

// =============================================================================
// Rule Kind
// =============================================================================

/// How a rule turns its base into a discount amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    /// A percentage of the discount base.
    Percentage { percent: Percentage },

    /// A fixed amount off each unit (`amount × quantity` per row).
    FixedAmount { amount: Money },

    /// A fixed amount off the row as a whole.
    FixedAmountPerLine { amount: Money },
}

// =============================================================================
// Discount Base Selection
// =============================================================================

/// Whether the discount is computed before or after tax is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTaxTreatment {
    /// Base is the row total excluding tax.
    #[default]
    PreTax,
    /// Base is the row total including tax.
    PostTax,
}

/// What a percentage rule takes its percentage of.
///
/// ## Example: $20.00 row, 50% rule then 10% rule
/// ```text
/// RowTotal       10% of $20.00            = $2.00
/// PriorDiscount  10% of $10.00 (50% rule) = $1.00
/// Remainder      10% of $20.00 - $10.00   = $1.00
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageBase {
    /// The original row base, regardless of earlier discounts.
    #[default]
    RowTotal,
    /// The previous rule's rounded discount amount for the same item.
    /// Falls back to the row base when this is the first applied rule.
    PriorDiscount,
    /// The row base minus everything discounted so far.
    Remainder,
}

// =============================================================================
// Conditions
// =============================================================================

/// A single rule condition. A rule applies only when ALL conditions hold.
///
/// Thresholds are optional in storage; a missing threshold makes the rule
/// malformed and the matcher skips it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Product is assigned to at least one of these categories.
    InCategory { category_ids: Vec<u32> },

    /// Line item quantity is at least `threshold`.
    MinItemQuantity { threshold: Option<i64> },

    /// Total cart quantity is at least `threshold`.
    MinCartQuantity { threshold: Option<i64> },

    /// Cart subtotal (pre-discount, pre-tax) is at least `threshold`.
    MinSubtotal { threshold: Option<Money> },
}

impl RuleCondition {
    /// Returns why this condition cannot be evaluated, if it can't.
    pub fn defect(&self) -> Option<String> {
        match self {
            RuleCondition::InCategory { category_ids } if category_ids.is_empty() => {
                Some("category condition has no categories".to_string())
            }
            RuleCondition::MinItemQuantity { threshold: None } => {
                Some("item quantity condition is missing its threshold".to_string())
            }
            RuleCondition::MinCartQuantity { threshold: None } => {
                Some("cart quantity condition is missing its threshold".to_string())
            }
            RuleCondition::MinSubtotal { threshold: None } => {
                Some("subtotal condition is missing its threshold".to_string())
            }
            _ => None,
        }
    }
}

// =============================================================================
// Promotion Rule
// =============================================================================

fn default_true() -> bool {
    true
}

/// A cart price rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionRule {
    pub id: u32,

    /// Store label shown next to the discount.
    pub label: String,

    pub kind: RuleKind,

    #[serde(default)]
    pub conditions: Vec<RuleCondition>,

    /// Lower values are evaluated first.
    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub stop_further_rules: bool,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,

    /// Exclusive upper bound.
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tax_treatment: DiscountTaxTreatment,

    #[serde(default)]
    pub percentage_base: PercentageBase,
}

impl PromotionRule {
    /// Creates an active, unconditional percentage rule.
    pub fn percentage(id: u32, label: impl Into<String>, percent_bps: u32) -> Self {
        Self::with_kind(
            id,
            label,
            RuleKind::Percentage {
                percent: Percentage::from_bps(percent_bps),
            },
        )
    }

    /// Creates an active, unconditional fixed-amount-per-unit rule.
    pub fn fixed_amount(id: u32, label: impl Into<String>, amount: Money) -> Self {
        Self::with_kind(id, label, RuleKind::FixedAmount { amount })
    }

    fn with_kind(id: u32, label: impl Into<String>, kind: RuleKind) -> Self {
        PromotionRule {
            id,
            label: label.into(),
            kind,
            conditions: Vec::new(),
            priority: 0,
            stop_further_rules: false,
            is_active: true,
            valid_from: None,
            valid_to: None,
            tax_treatment: DiscountTaxTreatment::PreTax,
            percentage_base: PercentageBase::RowTotal,
        }
    }

    pub fn with_condition(mut self, condition: RuleCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tax_treatment(mut self, treatment: DiscountTaxTreatment) -> Self {
        self.tax_treatment = treatment;
        self
    }

    pub fn with_percentage_base(mut self, base: PercentageBase) -> Self {
        self.percentage_base = base;
        self
    }

    pub fn stopping_further_rules(mut self) -> Self {
        self.stop_further_rules = true;
        self
    }

    /// True when this rule's percentage is taken of the previous discount.
    pub fn stacks_on_prior_discount(&self) -> bool {
        self.percentage_base == PercentageBase::PriorDiscount
    }

    /// Whether the validity window contains `now`.
    ///
    /// `valid_from` is inclusive, `valid_to` exclusive.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.valid_from.map_or(true, |from| from <= now);
        let not_ended = self.valid_to.map_or(true, |to| now < to);
        started && not_ended
    }

    /// Returns why this rule cannot be evaluated, if it can't.
    pub fn defect(&self) -> Option<String> {
        if self.label.trim().is_empty() {
            return Some("label is empty".to_string());
        }
        if self.label.len() > MAX_LABEL_LEN {
            return Some(format!("label exceeds {} characters", MAX_LABEL_LEN));
        }

        match self.kind {
            RuleKind::Percentage { percent } if percent.bps() > Percentage::FULL_BPS => {
                return Some(format!("percentage {} bps exceeds 100%", percent.bps()));
            }
            RuleKind::FixedAmount { amount } | RuleKind::FixedAmountPerLine { amount }
                if amount.is_negative() =>
            {
                return Some(format!("fixed amount {} is negative", amount));
            }
            _ => {}
        }

        if let (Some(from), Some(to)) = (self.valid_from, self.valid_to) {
            if to <= from {
                return Some("validity window ends before it starts".to_string());
            }
        }

        self.conditions.iter().find_map(RuleCondition::defect)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_validity_window_bounds() {
        let mut rule = PromotionRule::percentage(1, "TestRule", 5000);
        assert!(rule.is_valid_at(now()));

        rule.valid_from = Some(now());
        rule.valid_to = Some(now() + Duration::days(1));
        assert!(rule.is_valid_at(now()));
        assert!(!rule.is_valid_at(now() - Duration::seconds(1)));
        assert!(!rule.is_valid_at(now() + Duration::days(1)));
    }

    #[test]
    fn test_missing_threshold_is_a_defect() {
        let rule = PromotionRule::percentage(2, "10% off", 1000)
            .with_condition(RuleCondition::MinCartQuantity { threshold: None });
        assert!(rule.defect().unwrap().contains("threshold"));
    }

    #[test]
    fn test_empty_category_list_is_a_defect() {
        let rule = PromotionRule::percentage(2, "Cat", 1000)
            .with_condition(RuleCondition::InCategory { category_ids: vec![] });
        assert!(rule.defect().is_some());
    }

    #[test]
    fn test_percentage_over_100_is_a_defect() {
        let rule = PromotionRule::percentage(3, "Too much", 10_001);
        assert!(rule.defect().is_some());
        assert!(PromotionRule::percentage(3, "Free", 10_000).defect().is_none());
    }

    #[test]
    fn test_inverted_window_is_a_defect() {
        let mut rule = PromotionRule::percentage(4, "Window", 1000);
        rule.valid_from = Some(now());
        rule.valid_to = Some(now() - Duration::hours(1));
        assert!(rule.defect().is_some());
    }

    #[test]
    fn test_stacks_on_prior_discount_flag() {
        let rule = PromotionRule::percentage(5, "Stacked", 1000)
            .with_percentage_base(PercentageBase::PriorDiscount);
        assert!(rule.stacks_on_prior_discount());
        assert!(!PromotionRule::percentage(6, "Plain", 1000).stacks_on_prior_discount());
    }

    #[test]
    fn test_rule_deserializes_with_defaults() {
        let json = r#"{
            "id": 7,
            "label": "TestRule",
            "kind": { "type": "percentage", "percent": 5000 },
            "conditions": [{ "type": "in_category", "category_ids": [66] }]
        }"#;
        let rule: PromotionRule = serde_json::from_str(json).unwrap();
        assert!(rule.is_active);
        assert_eq!(rule.priority, 0);
        assert_eq!(rule.tax_treatment, DiscountTaxTreatment::PreTax);
        assert_eq!(rule.percentage_base, PercentageBase::RowTotal);
        assert!(rule.defect().is_none());
    }
}

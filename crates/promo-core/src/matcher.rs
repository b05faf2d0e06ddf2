//! # Rule Matcher
//!
//! Selects the promotion rules that apply to one line item, in evaluation
//! order.
//!
//! ## Matching Pipeline
//! ```text
//! rules ──► malformed? ──yes──► SkippedRule + warn!   (screen_rules, once per cart)
//!              │ no
//!              ▼
//!           inactive / outside window? ──yes──► dropped silently
//!              │ no
//!              ▼
//!           all conditions hold? ──no──► dropped
//!              │ yes
//!              ▼
//!           sort by (priority ASC, id ASC) ──► RuleMatch.rules
//! ```
//!
//! An empty match is not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::money::Money;
use crate::rule::{PromotionRule, RuleCondition};
use crate::types::{CartSnapshot, LineItem};

// =============================================================================
// Cart Context
// =============================================================================

/// Cart-wide facts that rule conditions can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartContext {
    /// Evaluation clock, supplied by the caller.
    pub now: DateTime<Utc>,

    pub total_quantity: i64,

    /// Sum of row totals before discounts and tax.
    pub subtotal: Money,
}

impl CartContext {
    pub fn from_cart(cart: &CartSnapshot, now: DateTime<Utc>) -> Self {
        CartContext {
            now,
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

// =============================================================================
// Match Result
// =============================================================================

/// A rule the matcher could not evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRule {
    pub rule_id: u32,
    pub reason: String,
}

/// Rules that apply to a line item, plus any skipped as malformed.
#[derive(Debug, Clone, Default)]
pub struct RuleMatch<'r> {
    /// Applicable rules, in evaluation order.
    pub rules: Vec<&'r PromotionRule>,

    pub skipped: Vec<SkippedRule>,
}

impl RuleMatch<'_> {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// =============================================================================
// Matching
// =============================================================================

fn condition_holds(condition: &RuleCondition, item: &LineItem, ctx: &CartContext) -> bool {
    match condition {
        RuleCondition::InCategory { category_ids } => item.in_any_category(category_ids),
        RuleCondition::MinItemQuantity {
            threshold: Some(min),
        } => item.quantity >= *min,
        RuleCondition::MinCartQuantity {
            threshold: Some(min),
        } => ctx.total_quantity >= *min,
        RuleCondition::MinSubtotal {
            threshold: Some(min),
        } => ctx.subtotal >= *min,
        // Malformed conditions are filtered out before evaluation.
        _ => false,
    }
}

/// Rules split into those that can be evaluated and those skipped as
/// malformed.
#[derive(Debug, Clone, Default)]
pub struct ScreenedRules<'r> {
    /// Well-formed rules, in input order.
    pub valid: Vec<&'r PromotionRule>,

    pub skipped: Vec<SkippedRule>,
}

/// Separates malformed rules from the rest. Logs one warning per
/// malformed rule, so run it once per cart rather than once per item.
pub fn screen_rules(rules: &[PromotionRule]) -> ScreenedRules<'_> {
    let mut screened = ScreenedRules::default();

    for rule in rules {
        match rule.defect() {
            Some(reason) => {
                warn!(rule_id = rule.id, %reason, "Skipping malformed promotion rule");
                screened.skipped.push(SkippedRule {
                    rule_id: rule.id,
                    reason,
                });
            }
            None => screened.valid.push(rule),
        }
    }

    screened
}

/// Selects the already screened rules that apply to `item`, ordered by
/// priority then id.
pub fn match_screened<'r>(
    item: &LineItem,
    ctx: &CartContext,
    rules: &[&'r PromotionRule],
) -> Vec<&'r PromotionRule> {
    let mut matched: Vec<&'r PromotionRule> = rules
        .iter()
        .copied()
        .filter(|rule| rule.is_active && rule.is_valid_at(ctx.now))
        .filter(|rule| {
            rule.conditions
                .iter()
                .all(|condition| condition_holds(condition, item, ctx))
        })
        .inspect(|rule| debug!(rule_id = rule.id, sku = %item.sku, "Rule matched"))
        .collect();

    matched.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.id.cmp(&b.id)));
    matched
}

/// Selects the rules that apply to `item`, ordered by priority then id.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use promo_core::matcher::{match_rules, CartContext};
/// use promo_core::money::Money;
/// use promo_core::rule::{PromotionRule, RuleCondition};
/// use promo_core::types::{CartSnapshot, LineItem};
///
/// let mut cart = CartSnapshot::new();
/// cart.items.push(LineItem {
///     product_id: "1".into(),
///     sku: "simple1".into(),
///     unit_price: Money::from_cents(1000),
///     quantity: 2,
///     tax_class_id: "taxable".into(),
///     category_ids: vec![66],
/// });
/// let rules = vec![PromotionRule::percentage(1, "TestRule", 5000)
///     .with_condition(RuleCondition::InCategory { category_ids: vec![66] })];
///
/// let ctx = CartContext::from_cart(&cart, Utc::now());
/// let matched = match_rules(&cart.items[0], &ctx, &rules);
/// assert_eq!(matched.rules.len(), 1);
/// ```
pub fn match_rules<'r>(
    item: &LineItem,
    ctx: &CartContext,
    rules: &'r [PromotionRule],
) -> RuleMatch<'r> {
    let screened = screen_rules(rules);

    RuleMatch {
        rules: match_screened(item, ctx, &screened.valid),
        skipped: screened.skipped,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

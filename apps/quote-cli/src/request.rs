//! Quote request read from the input file or stdin.

use chrono::{DateTime, Utc};
use promo_core::tax::TaxTable;
use promo_core::{CartSnapshot, PromotionRule};
use serde::{Deserialize, Serialize};

/// Everything needed to price one cart.
///
/// ## Example
/// ```json
/// {
///   "cart": {
///     "cart_id": "7f0c3c1e-2d7a-4c38-9d9b-0f6f2b3f6a10",
///     "items": [{
///       "product_id": "1", "sku": "simple1", "unit_price": 1000,
///       "quantity": 2, "tax_class_id": "taxable", "category_ids": [66]
///     }]
///   },
///   "rules": [{
///     "id": 1, "label": "TestRule",
///     "kind": { "type": "percentage", "percent": 5000 },
///     "conditions": [{ "type": "in_category", "category_ids": [66] }]
///   }],
///   "tax_table": { "classes": [{ "tax_class_id": "taxable" }] }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub cart: CartSnapshot,

    #[serde(default)]
    pub rules: Vec<PromotionRule>,

    #[serde(default)]
    pub tax_table: TaxTable,

    /// Evaluation time for rule validity windows. Defaults to now.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

impl QuoteRequest {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_minimal_request() {
        let request = QuoteRequest::from_json(
            r#"{
                "cart": {
                    "cart_id": "7f0c3c1e-2d7a-4c38-9d9b-0f6f2b3f6a10",
                    "items": []
                }
            }"#,
        )
        .unwrap();

        assert!(request.rules.is_empty());
        assert!(request.tax_table.classes.is_empty());
        assert!(request.now.is_none());
    }

    #[test]
    fn test_explicit_clock_is_used() {
        let request = QuoteRequest::from_json(
            r#"{
                "cart": { "cart_id": "7f0c3c1e-2d7a-4c38-9d9b-0f6f2b3f6a10", "items": [] },
                "now": "2024-06-01T12:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(
            request.evaluated_at(),
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_cart_rejected() {
        assert!(QuoteRequest::from_json(r#"{ "rules": [] }"#).is_err());
    }
}

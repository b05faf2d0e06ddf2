//! # App Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppError                                                               │
//! │  ├── Config*       - promo.toml missing/unreadable/invalid             │
//! │  ├── Io / Json     - request could not be read or parsed               │
//! │  └── Pricing       - promo-core rejected the cart (CoreError)          │
//! │                                                                         │
//! │  Every AppError also renders as an ErrorResponse JSON body so          │
//! │  callers get a machine-readable code.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use promo_core::CoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pricing failed: {0}")]
    Pricing(#[from] CoreError),
}

pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Error Response
// =============================================================================

/// JSON error body written to stdout when a quote fails.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INVALID_CART",
///   "message": "Line item 0 (simple1) is invalid: quantity must be between 1 and 999"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A line item or the cart itself failed validation
    InvalidCart,

    /// No tax rate for an item's tax class
    UnknownTaxClass,

    /// Request body was not valid JSON or had the wrong shape
    InvalidRequest,

    /// Configuration could not be loaded
    ConfigError,

    /// Anything else
    Internal,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ErrorResponse {
            code,
            message: message.into(),
        }
    }
}

impl From<&CoreError> for ErrorResponse {
    fn from(err: &CoreError) -> Self {
        let code = match err {
            CoreError::UnknownTaxClass { .. } => ErrorCode::UnknownTaxClass,
            CoreError::InvalidLineItem { .. }
            | CoreError::CartTooLarge { .. }
            | CoreError::Validation(_) => ErrorCode::InvalidCart,
        };
        ErrorResponse::new(code, err.to_string())
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Pricing(core) => core.into(),
            AppError::Json(e) => ErrorResponse::new(ErrorCode::InvalidRequest, e.to_string()),
            AppError::ConfigNotFound(_) | AppError::ConfigParse(_) | AppError::InvalidConfig(_) => {
                ErrorResponse::new(ErrorCode::ConfigError, err.to_string())
            }
            AppError::Io(e) => {
                error!(error = %e, "I/O failure");
                ErrorResponse::new(ErrorCode::Internal, "Failed to read input")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promo_core::ValidationError;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err = CoreError::UnknownTaxClass {
            index: 1,
            tax_class_id: "luxury".into(),
        };
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, ErrorCode::UnknownTaxClass);
        assert!(body.message.contains("luxury"));

        let err = CoreError::InvalidLineItem {
            index: 0,
            sku: "simple1".into(),
            source: ValidationError::MustBePositive {
                field: "quantity".into(),
            },
        };
        assert_eq!(ErrorResponse::from(&err).code, ErrorCode::InvalidCart);
    }

    #[test]
    fn test_error_code_serializes_screaming_snake_case() {
        let body = ErrorResponse::new(ErrorCode::UnknownTaxClass, "nope");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "UNKNOWN_TAX_CLASS");
        assert_eq!(json["message"], "nope");
    }

    #[test]
    fn test_bad_json_is_invalid_request() {
        let err: AppError = serde_json::from_str::<u32>("{").unwrap_err().into();
        assert_eq!(ErrorResponse::from(&err).code, ErrorCode::InvalidRequest);
    }
}

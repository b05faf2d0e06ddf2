//! # Quote Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PROMO_LABEL_SUFFIX=_Label                                          │
//! │     PROMO_TAX_MODE=inclusive                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or ./promo.toml when present                      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! label_suffix = "_Label"
//! tax_mode = "exclusive"   # exclusive | inclusive
//! currency_symbol = "$"
//! log_level = "info"
//! max_cart_items = 100
//! max_item_quantity = 999
//! ```

use std::path::{Path, PathBuf};

use promo_core::engine::EngineOptions;
use promo_core::{Money, TaxMode, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "promo.toml";

fn default_label_suffix() -> String {
    "_Label".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_cart_items() -> usize {
    MAX_CART_ITEMS
}

fn default_max_item_quantity() -> i64 {
    MAX_ITEM_QUANTITY
}

/// Quote CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Appended to every rule label in responses.
    #[serde(default = "default_label_suffix")]
    pub label_suffix: String,

    /// Whether catalog prices include tax.
    #[serde(default)]
    pub tax_mode: TaxMode,

    /// Used by the text output format.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_max_cart_items")]
    pub max_cart_items: usize,

    #[serde(default = "default_max_item_quantity")]
    pub max_item_quantity: i64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            label_suffix: default_label_suffix(),
            tax_mode: TaxMode::Exclusive,
            currency_symbol: default_currency_symbol(),
            log_level: default_log_level(),
            max_cart_items: default_max_cart_items(),
            max_item_quantity: default_max_item_quantity(),
        }
    }
}

impl QuoteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else `./promo.toml` if it exists)
    /// 3. Environment variables
    ///
    /// An explicitly given path that does not exist is an error.
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => {
                return Err(AppError::ConfigNotFound(path.to_path_buf()));
            }
            Some(path) => Self::from_file(path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Reads a TOML config file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading quote config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_cart_items == 0 {
            return Err(AppError::InvalidConfig(
                "max_cart_items must be greater than 0".into(),
            ));
        }

        if self.max_item_quantity <= 0 {
            return Err(AppError::InvalidConfig(
                "max_item_quantity must be greater than 0".into(),
            ));
        }

        if self.log_level.trim().is_empty() {
            return Err(AppError::InvalidConfig("log_level must not be empty".into()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> AppResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `PROMO_*` overrides from `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(suffix) = lookup("PROMO_LABEL_SUFFIX") {
            debug!(%suffix, "Overriding label suffix from environment");
            self.label_suffix = suffix;
        }

        if let Some(mode) = lookup("PROMO_TAX_MODE") {
            self.tax_mode = parse_tax_mode(&mode)?;
        }

        if let Some(symbol) = lookup("PROMO_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(level) = lookup("PROMO_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(max) = lookup("PROMO_MAX_CART_ITEMS") {
            self.max_cart_items = max
                .parse()
                .map_err(|_| AppError::InvalidConfig(format!("PROMO_MAX_CART_ITEMS: {}", max)))?;
        }

        if let Some(max) = lookup("PROMO_MAX_ITEM_QUANTITY") {
            self.max_item_quantity = max.parse().map_err(|_| {
                AppError::InvalidConfig(format!("PROMO_MAX_ITEM_QUANTITY: {}", max))
            })?;
        }

        Ok(())
    }

    /// Engine settings derived from this config.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            tax_mode: self.tax_mode,
            max_cart_items: self.max_cart_items,
            max_item_quantity: self.max_item_quantity,
        }
    }

    /// Formats money for the text output (`$10.75`).
    pub fn format_money(&self, amount: Money) -> String {
        let cents = amount.cents();
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}

fn parse_tax_mode(value: &str) -> AppResult<TaxMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "exclusive" => Ok(TaxMode::Exclusive),
        "inclusive" => Ok(TaxMode::Inclusive),
        other => Err(AppError::InvalidConfig(format!(
            "tax_mode must be 'exclusive' or 'inclusive', got '{}'",
            other
        ))),
    }
}

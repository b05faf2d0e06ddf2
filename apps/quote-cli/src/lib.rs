//! # promo-quote
//!
//! Quotes cart promotions from a JSON request and renders the storefront
//! cart prices response.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stdin / --input ──► QuoteRequest ──► promo_core::quote_cart            │
//! │                                              │                          │
//! │  promo.toml + PROMO_* ──► QuoteConfig ───────┤ EngineOptions            │
//! │                                              ▼                          │
//! │                                          CartQuote                      │
//! │                                              │                          │
//! │                      ┌───────────────────────┴──────────────┐           │
//! │                      ▼                                      ▼           │
//! │            CartPricesResponse (json)                 render_text        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod request;
pub mod response;

use std::io::Read;
use std::path::Path;

use promo_core::engine::{quote_cart, CartQuote};
use tracing::{debug, info};

use crate::config::QuoteConfig;
use crate::error::AppResult;
use crate::request::QuoteRequest;
use crate::response::CartPricesResponse;

/// Reads the raw request from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> AppResult<String> {
    match path {
        Some(path) => {
            debug!(?path, "Reading quote request from file");
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Prices the request's cart with the configured engine options.
pub fn run_quote(request: &QuoteRequest, config: &QuoteConfig) -> AppResult<CartQuote> {
    let now = request.evaluated_at();
    info!(
        cart_id = %request.cart.cart_id,
        rules = request.rules.len(),
        %now,
        "Quoting cart"
    );

    let quote = quote_cart(
        &request.cart,
        &request.rules,
        &request.tax_table,
        now,
        &config.engine_options(),
    )?;

    Ok(quote)
}

/// Prices the request and shapes the storefront response.
pub fn quote_response(request: &QuoteRequest, config: &QuoteConfig) -> AppResult<CartPricesResponse> {
    let quote = run_quote(request, config)?;
    Ok(CartPricesResponse::from_quote(
        request.cart.cart_id.to_string(),
        &quote,
        &config.label_suffix,
    ))
}

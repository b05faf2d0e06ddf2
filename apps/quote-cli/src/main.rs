//! # promo-quote
//!
//! ```text
//! promo-quote --input cart.json --config promo.toml --format json
//! cat cart.json | promo-quote --format text
//! ```
//!
//! Logs go to stderr. Stdout carries either the quote or an
//! `{ code, message }` error body; failures also exit non-zero.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use promo_quote::config::QuoteConfig;
use promo_quote::error::{AppError, AppResult, ErrorResponse};
use promo_quote::request::QuoteRequest;
use promo_quote::response::{CartPricesResponse, Receipt};
use promo_quote::{read_input, run_quote};

/// Log level used when the config itself could not be loaded.
const FALLBACK_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Quote cart promotions from a JSON cart snapshot.
#[derive(Debug, Parser)]
#[command(name = "promo-quote", version, about)]
struct Cli {
    /// Quote request file. Reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Config file. Defaults to ./promo.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

/// Initializes logging to stderr.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads, prices and renders one request.
fn quote(cli: &Cli, config: &QuoteConfig) -> AppResult<String> {
    let input = read_input(cli.input.as_deref())?;
    let request = QuoteRequest::from_json(&input)?;
    let quote = run_quote(&request, config)?;

    Ok(match cli.format {
        OutputFormat::Json => {
            let response = CartPricesResponse::from_quote(
                request.cart.cart_id.to_string(),
                &quote,
                &config.label_suffix,
            );
            serde_json::to_string_pretty(&response)?
        }
        OutputFormat::Text => Receipt::new(&quote, config).to_string(),
    })
}

/// Writes the error body to stdout.
fn report(err: &AppError) -> anyhow::Result<ExitCode> {
    error!(error = %err, "Quote failed");
    println!("{}", serde_json::to_string_pretty(&ErrorResponse::from(err))?);
    Ok(ExitCode::FAILURE)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match QuoteConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            init_tracing(FALLBACK_LOG_LEVEL);
            return report(&err);
        }
    };
    init_tracing(&config.log_level);

    match quote(&cli, &config) {
        Ok(output) => {
            println!("{}", output.trim_end());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report(&err),
    }
}

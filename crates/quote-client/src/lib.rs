//! # Quote Client
//!
//! The quote gateway: given a ticker, fetch the most recent daily close.
//!
//! `QuoteSource` is the contract the rest of the system depends on, so the live
//! Yahoo Finance implementation can be swapped for a stub in tests. "No data" is
//! a normal answer (`Ok(None)`), distinct from a failed lookup (`Err`).

use crate::error::QuoteError;
use async_trait::async_trait;
use configuration::QuoteSettings;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::time::Duration;
use urlencoding::encode;
use yahoo_finance_api as yahoo;
use yahoo::{YahooConnector, YahooError};

pub mod error;

/// The generic interface for a source of latest prices.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Returns the latest daily closing price for `ticker`, or `None` when the
    /// provider has no data for it.
    async fn latest_close(&self, ticker: &str) -> Result<Option<Decimal>, QuoteError>;
}

/// A `QuoteSource` backed by Yahoo Finance.
pub struct YahooClient {
    connector: YahooConnector,
    symbol_suffix: String,
}

impl YahooClient {
    pub fn new(settings: &QuoteSettings) -> Result<Self, QuoteError> {
        let connector = YahooConnector::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(QuoteError::Client)?;

        Ok(Self {
            connector,
            symbol_suffix: settings.symbol_suffix.clone(),
        })
    }

    /// The provider symbol for a ticker, e.g. `7203` → `7203.T`.
    pub fn symbol_for(&self, ticker: &str) -> String {
        format!("{}{}", ticker.trim(), self.symbol_suffix)
    }
}

#[async_trait]
impl QuoteSource for YahooClient {
    async fn latest_close(&self, ticker: &str) -> Result<Option<Decimal>, QuoteError> {
        let symbol = self.symbol_for(ticker);
        // The connector splices the symbol into the request path as-is.
        let request_symbol = encode(&symbol);

        let quote = self
            .connector
            .get_latest_quotes(&request_symbol, "1d")
            .await
            .and_then(|response| response.last_quote());

        match quote {
            Ok(quote) => {
                let close = positive_close(quote.close);
                tracing::debug!(%symbol, ?close, "Fetched latest close.");
                Ok(close)
            }
            Err(e) if is_no_data(&e) => {
                tracing::debug!(%symbol, error = %e, "Quote provider has no data for symbol.");
                Ok(None)
            }
            Err(e) => Err(QuoteError::Provider {
                symbol,
                message: e.to_string(),
            }),
        }
    }
}

/// Errors that mean "nothing to report" rather than a failed lookup.
fn is_no_data(error: &YahooError) -> bool {
    match error {
        YahooError::EmptyDataSet | YahooError::NoQuotes | YahooError::NoResult => true,
        // Unknown symbols are answered with HTTP 404.
        YahooError::FetchFailed(status) => status.contains("404"),
        _ => false,
    }
}

/// A close is only usable when it is a finite, positive number.
fn positive_close(close: f64) -> Option<Decimal> {
    Decimal::from_f64(close)
        .map(|d| d.round_dp(6).normalize())
        .filter(|d| *d > Decimal::ZERO)
}

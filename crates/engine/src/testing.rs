//! Shared fixtures for the engine's unit tests.

use crate::service::PortfolioService;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::NewAsset;
use database::{connect_in_memory, DbRepository};
use quote_client::error::QuoteError;
use quote_client::QuoteSource;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Canned answers per ticker. Unknown tickers have no data.
#[derive(Default)]
pub(crate) struct StubQuotes {
    prices: HashMap<String, Decimal>,
    failing: Vec<String>,
}

impl StubQuotes {
    pub fn with_price(mut self, ticker: &str, price: Decimal) -> Self {
        self.prices.insert(ticker.to_string(), price);
        self
    }

    pub fn failing(mut self, ticker: &str) -> Self {
        self.failing.push(ticker.to_string());
        self
    }
}

#[async_trait]
impl QuoteSource for StubQuotes {
    async fn latest_close(&self, ticker: &str) -> Result<Option<Decimal>, QuoteError> {
        if self.failing.iter().any(|t| t == ticker) {
            return Err(QuoteError::Provider {
                symbol: ticker.to_string(),
                message: "upstream unavailable".to_string(),
            });
        }
        Ok(self.prices.get(ticker).copied())
    }
}

pub(crate) async fn service(quotes: StubQuotes) -> PortfolioService {
    let pool = connect_in_memory().await.unwrap();
    PortfolioService::new(DbRepository::new(pool), Arc::new(quotes))
}

pub(crate) fn new_asset(ticker: &str, quantity: Decimal, purchase_price: Decimal) -> NewAsset {
    NewAsset {
        name: format!("{ticker} Corp."),
        ticker: ticker.to_string(),
        asset_type: "equity".to_string(),
        quantity,
        purchase_price,
        purchase_date: date(2024, 1, 4),
    }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

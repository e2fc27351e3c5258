use thiserror::Error;
use yahoo_finance_api::YahooError;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Failed to initialise the quote client: {0}")]
    Client(#[source] YahooError),

    #[error("The quote provider failed for {symbol}: {message}")]
    Provider { symbol: String, message: String },
}

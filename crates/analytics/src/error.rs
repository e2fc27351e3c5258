use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid price: {0} (must be greater than zero)")]
    InvalidPrice(Decimal),

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionUndefined(String),

    #[error("Calculation error: '{0}' is out of the representable range")]
    Overflow(String),

    #[error("Invalid range: start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One historical (date, price, value) record for an asset.
///
/// Snapshots are append-only. Several snapshots may share a date for the same
/// asset when its price is refreshed more than once a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub id: i64,
    pub asset_id: i64,
    pub date: NaiveDate,
    pub price: Decimal,
    /// Quantity held at the time of the snapshot multiplied by `price`.
    pub value: Decimal,
}

/// A snapshot that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPriceSnapshot {
    pub asset_id: i64,
    pub date: NaiveDate,
    pub price: Decimal,
    pub value: Decimal,
}

impl NewPriceSnapshot {
    /// Captures the asset's current price and value on `date`.
    pub fn of(asset: &crate::Asset, date: NaiveDate) -> Self {
        Self {
            asset_id: asset.id,
            date,
            price: asset.current_price,
            value: asset.current_value,
        }
    }
}

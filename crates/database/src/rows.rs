//! Raw row shapes as stored in SQLite, and their conversion into domain records.

use crate::error::DbError;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{Asset, PriceSnapshot};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, FromRow)]
pub(crate) struct AssetRow {
    pub id: i64,
    pub name: String,
    pub ticker: String,
    #[sqlx(rename = "type")]
    pub asset_type: String,
    pub quantity: String,
    pub purchase_price: String,
    pub purchase_date: NaiveDate,
    pub current_price: String,
    pub current_value: String,
    pub performance: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub(crate) struct PriceSnapshotRow {
    pub id: i64,
    pub asset_id: i64,
    pub date: NaiveDate,
    pub price: String,
    pub value: String,
}

fn decimal(column: &'static str, raw: &str) -> Result<Decimal, DbError> {
    Decimal::from_str(raw).map_err(|e| DbError::Decode {
        column,
        reason: format!("'{}': {}", raw, e),
    })
}

impl TryFrom<AssetRow> for Asset {
    type Error = DbError;

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        Ok(Asset {
            quantity: decimal("quantity", &row.quantity)?,
            purchase_price: decimal("purchase_price", &row.purchase_price)?,
            current_price: decimal("current_price", &row.current_price)?,
            current_value: decimal("current_value", &row.current_value)?,
            performance: decimal("performance", &row.performance)?,
            id: row.id,
            name: row.name,
            ticker: row.ticker,
            asset_type: row.asset_type,
            purchase_date: row.purchase_date,
            last_updated: row.last_updated,
        })
    }
}

impl TryFrom<PriceSnapshotRow> for PriceSnapshot {
    type Error = DbError;

    fn try_from(row: PriceSnapshotRow) -> Result<Self, Self::Error> {
        Ok(PriceSnapshot {
            id: row.id,
            asset_id: row.asset_id,
            date: row.date,
            price: decimal("price", &row.price)?,
            value: decimal("value", &row.value)?,
        })
    }
}

use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single holding in the portfolio.
///
/// `current_value` and `performance` are derived from the quantity and prices.
/// They are only ever recomputed by the valuation engine, never set directly
/// from client input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub ticker: String,
    /// Free-form category tag (equity, fund, bond, ...).
    #[serde(rename = "type")]
    pub asset_type: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
    pub current_price: Decimal,
    pub current_value: Decimal,
    /// Percent change of `current_price` relative to `purchase_price`.
    pub performance: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl Asset {
    /// Builds a not-yet-persisted asset from a creation request.
    ///
    /// The current price starts at the purchase price, so the holding is valued
    /// at cost with 0% performance. The `id` is assigned on insert. Fails when
    /// the position value does not fit in a `Decimal`.
    pub fn pending(new: NewAsset, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let current_value = new
            .quantity
            .checked_mul(new.purchase_price)
            .ok_or_else(|| CoreError::invalid("quantity", "position value is out of range"))?;
        Ok(Self {
            id: 0,
            current_price: new.purchase_price,
            current_value,
            performance: Decimal::ZERO,
            name: new.name,
            ticker: new.ticker,
            asset_type: new.asset_type,
            quantity: new.quantity,
            purchase_price: new.purchase_price,
            purchase_date: new.purchase_date,
            last_updated: now,
        })
    }

    /// The amount originally paid for the whole position, or `None` on overflow.
    pub fn cost_basis(&self) -> Option<Decimal> {
        self.purchase_price.checked_mul(self.quantity)
    }

    /// Checks the holding-level constraints shared by create and update.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_holding(
            &self.name,
            &self.ticker,
            &self.asset_type,
            self.quantity,
            self.purchase_price,
        )
    }
}

/// The body of a `POST /assets` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAsset {
    pub name: String,
    pub ticker: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
}

impl NewAsset {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_holding(
            &self.name,
            &self.ticker,
            &self.asset_type,
            self.quantity,
            self.purchase_price,
        )
    }
}

/// The body of a `PUT /assets/{id}` request. Only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default, rename = "type")]
    pub asset_type: Option<String>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub purchase_price: Option<Decimal>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub current_price: Option<Decimal>,
}

impl AssetUpdate {
    /// Copies every supplied field onto `asset`.
    ///
    /// Derived fields are left untouched; the caller revalues the asset
    /// afterwards so they agree with the merged inputs.
    pub fn merge(&self, asset: &mut Asset) {
        if let Some(name) = &self.name {
            asset.name = name.clone();
        }
        if let Some(ticker) = &self.ticker {
            asset.ticker = ticker.clone();
        }
        if let Some(asset_type) = &self.asset_type {
            asset.asset_type = asset_type.clone();
        }
        if let Some(quantity) = self.quantity {
            asset.quantity = quantity;
        }
        if let Some(purchase_price) = self.purchase_price {
            asset.purchase_price = purchase_price;
        }
        if let Some(purchase_date) = self.purchase_date {
            asset.purchase_date = purchase_date;
        }
        if let Some(current_price) = self.current_price {
            asset.current_price = current_price;
        }
    }

    /// True when the update carries an explicit price change.
    pub fn changes_price(&self) -> bool {
        self.current_price.is_some()
    }
}

fn validate_holding(
    name: &str,
    ticker: &str,
    asset_type: &str,
    quantity: Decimal,
    purchase_price: Decimal,
) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid("name", "must not be empty"));
    }
    if ticker.trim().is_empty() {
        return Err(CoreError::invalid("ticker", "must not be empty"));
    }
    if asset_type.trim().is_empty() {
        return Err(CoreError::invalid("type", "must not be empty"));
    }
    if quantity < Decimal::ZERO {
        return Err(CoreError::invalid("quantity", "must be zero or greater"));
    }
    if purchase_price <= Decimal::ZERO {
        return Err(CoreError::invalid("purchase_price", "must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_asset() -> NewAsset {
        NewAsset {
            name: "Toyota Motor".to_string(),
            ticker: "7203".to_string(),
            asset_type: "equity".to_string(),
            quantity: dec!(100),
            purchase_price: dec!(1000),
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        }
    }

    #[test]
    fn pending_asset_is_valued_at_cost() {
        let asset = Asset::pending(new_asset(), Utc::now()).unwrap();
        assert_eq!(asset.current_price, dec!(1000));
        assert_eq!(asset.current_value, dec!(100000));
        assert_eq!(asset.performance, Decimal::ZERO);
        assert_eq!(asset.cost_basis(), Some(dec!(100000)));
    }

    #[test]
    fn oversized_position_is_an_input_error() {
        let mut req = new_asset();
        req.quantity = Decimal::MAX;
        req.purchase_price = dec!(100);
        assert!(req.validate().is_ok());
        assert!(matches!(
            Asset::pending(req, Utc::now()),
            Err(CoreError::InvalidInput(f, _)) if f == "quantity"
        ));
    }

    #[test]
    fn rejects_non_positive_purchase_price() {
        let mut req = new_asset();
        req.purchase_price = Decimal::ZERO;
        assert!(matches!(req.validate(), Err(CoreError::InvalidInput(f, _)) if f == "purchase_price"));
    }

    #[test]
    fn rejects_negative_quantity_but_allows_zero() {
        let mut req = new_asset();
        req.quantity = dec!(-1);
        assert!(req.validate().is_err());
        req.quantity = Decimal::ZERO;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_blank_ticker() {
        let mut req = new_asset();
        req.ticker = "  ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn merge_only_touches_supplied_fields() {
        let mut asset = Asset::pending(new_asset(), Utc::now()).unwrap();
        let update = AssetUpdate {
            name: Some("Toyota".to_string()),
            quantity: Some(dec!(200)),
            ..Default::default()
        };
        update.merge(&mut asset);

        assert_eq!(asset.name, "Toyota");
        assert_eq!(asset.quantity, dec!(200));
        assert_eq!(asset.ticker, "7203");
        assert_eq!(asset.purchase_price, dec!(1000));
        assert!(!update.changes_price());
    }

    #[test]
    fn empty_update_deserializes_to_no_changes() {
        let update: AssetUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(update, AssetUpdate::default());
    }

    #[test]
    fn asset_type_uses_type_key_in_json() {
        let asset = Asset::pending(new_asset(), Utc::now()).unwrap();
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["type"], "equity");
        assert_eq!(json["current_value"].as_f64(), Some(100000.0));
    }
}

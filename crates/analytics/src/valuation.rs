use crate::error::AnalyticsError;
use crate::util::{checked_mul, checked_sub, percent_of};
use core_types::Asset;
use rust_decimal::Decimal;

/// Recomputes an asset's market data at `new_price`.
///
/// Sets `current_price`, `current_value = quantity * new_price` and
/// `performance = (new_price - purchase_price) / purchase_price * 100`.
/// Appending the matching price snapshot is left to the caller.
pub fn revalue(mut asset: Asset, new_price: Decimal) -> Result<Asset, AnalyticsError> {
    if new_price <= Decimal::ZERO {
        return Err(AnalyticsError::InvalidPrice(new_price));
    }
    if asset.purchase_price.is_zero() {
        return Err(AnalyticsError::DivisionUndefined("performance".to_string()));
    }

    let current_value = checked_mul(asset.quantity, new_price, "current_value")?;
    let gain = checked_sub(new_price, asset.purchase_price, "performance")?;
    let performance = percent_of(gain, asset.purchase_price, "performance")?;

    asset.current_price = new_price;
    asset.current_value = current_value;
    asset.performance = performance;
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use core_types::NewAsset;
    use rust_decimal_macros::dec;

    fn asset(quantity: Decimal, purchase_price: Decimal) -> Asset {
        Asset::pending(
            NewAsset {
                name: "Test Equity".to_string(),
                ticker: "TEST".to_string(),
                asset_type: "equity".to_string(),
                quantity,
                purchase_price,
                purchase_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn revalues_value_and_performance() {
        let revalued = revalue(asset(dec!(100), dec!(1000)), dec!(1100)).unwrap();
        assert_eq!(revalued.current_price, dec!(1100));
        assert_eq!(revalued.current_value, dec!(110000));
        assert_eq!(revalued.performance, dec!(10));
    }

    #[test]
    fn loss_is_negative_performance() {
        let revalued = revalue(asset(dec!(50), dec!(1000)), dec!(900)).unwrap();
        assert_eq!(revalued.current_value, dec!(45000));
        assert_eq!(revalued.performance, dec!(-10));
    }

    #[test]
    fn zero_quantity_is_worth_nothing() {
        let revalued = revalue(asset(Decimal::ZERO, dec!(10)), dec!(12)).unwrap();
        assert_eq!(revalued.current_value, Decimal::ZERO);
        assert_eq!(revalued.performance, dec!(20));
    }

    #[test]
    fn rejects_non_positive_price() {
        assert_eq!(
            revalue(asset(dec!(1), dec!(10)), Decimal::ZERO),
            Err(AnalyticsError::InvalidPrice(Decimal::ZERO))
        );
        assert!(matches!(
            revalue(asset(dec!(1), dec!(10)), dec!(-3)),
            Err(AnalyticsError::InvalidPrice(_))
        ));
    }

    #[test]
    fn oversized_value_is_an_overflow_error() {
        let result = revalue(asset(dec!(10000000000000000000000000000), dec!(1)), dec!(100));
        assert_eq!(result, Err(AnalyticsError::Overflow("current_value".to_string())));
    }

    #[test]
    fn tiny_purchase_price_overflows_performance() {
        let result = revalue(asset(dec!(1), dec!(0.00000000000000000001)), dec!(1000000000000));
        assert_eq!(result, Err(AnalyticsError::Overflow("performance".to_string())));
    }

    #[test]
    fn zero_purchase_price_is_an_explicit_error() {
        let mut holding = asset(dec!(1), dec!(10));
        holding.purchase_price = Decimal::ZERO;
        assert!(matches!(
            revalue(holding, dec!(5)),
            Err(AnalyticsError::DivisionUndefined(_))
        ));
    }
}

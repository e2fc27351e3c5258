use crate::error::AnalyticsError;
use crate::report::{AllocationEntry, Summary};
use crate::util::{checked_add, checked_sub, percent_of};
use core_types::Asset;

/// Totals current value and cost across `assets` and buckets value by type.
pub fn summarize(assets: &[Asset]) -> Result<Summary, AnalyticsError> {
    let mut summary = Summary::empty();

    for asset in assets {
        let cost = asset
            .cost_basis()
            .ok_or_else(|| AnalyticsError::Overflow("total_cost".to_string()))?;
        summary.total_value = checked_add(summary.total_value, asset.current_value, "total_value")?;
        summary.total_cost = checked_add(summary.total_cost, cost, "total_cost")?;
        allocate(&mut summary.asset_allocation, asset)?;
    }

    summary.total_gain_loss = checked_sub(summary.total_value, summary.total_cost, "total_gain_loss")?;
    summary.total_performance =
        percent_of(summary.total_gain_loss, summary.total_cost, "total_performance")?;
    Ok(summary)
}

/// Adds the asset's value to its type bucket, keeping first-seen order.
fn allocate(allocation: &mut Vec<AllocationEntry>, asset: &Asset) -> Result<(), AnalyticsError> {
    match allocation
        .iter_mut()
        .find(|entry| entry.asset_type == asset.asset_type)
    {
        Some(entry) => entry.value = checked_add(entry.value, asset.current_value, "asset_allocation")?,
        None => allocation.push(AllocationEntry {
            asset_type: asset.asset_type.clone(),
            value: asset.current_value,
        }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::revalue;
    use chrono::{NaiveDate, Utc};
    use core_types::NewAsset;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn holding(asset_type: &str, quantity: Decimal, cost: Decimal, price: Decimal) -> Asset {
        let pending = Asset::pending(
            NewAsset {
                name: format!("{asset_type} holding"),
                ticker: "TICK".to_string(),
                asset_type: asset_type.to_string(),
                quantity,
                purchase_price: cost,
                purchase_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            },
            Utc::now(),
        )
        .unwrap();
        revalue(pending, price).unwrap()
    }

    #[test]
    fn totals_gain_and_performance() {
        let assets = vec![
            holding("equity", dec!(100), dec!(1000), dec!(1100)),
            holding("bond", dec!(50), dec!(1000), dec!(900)),
        ];
        let summary = summarize(&assets).unwrap();

        assert_eq!(summary.total_cost, dec!(150000));
        assert_eq!(summary.total_value, dec!(155000));
        assert_eq!(summary.total_gain_loss, dec!(5000));
        assert_eq!(summary.total_performance.round_dp(2), dec!(3.33));
    }

    #[test]
    fn empty_portfolio_has_zero_performance() {
        let summary = summarize(&[]).unwrap();
        assert_eq!(summary, Summary::empty());
    }

    #[test]
    fn zero_cost_portfolio_has_zero_performance() {
        let assets = vec![holding("fund", Decimal::ZERO, dec!(10), dec!(20))];
        let summary = summarize(&assets).unwrap();
        assert_eq!(summary.total_cost, Decimal::ZERO);
        assert_eq!(summary.total_performance, Decimal::ZERO);
        assert_eq!(summary.total_gain_loss, summary.total_value - summary.total_cost);
    }

    #[test]
    fn allocation_keeps_first_seen_type_order() {
        let assets = vec![
            holding("fund", dec!(1), dec!(10), dec!(10)),
            holding("equity", dec!(2), dec!(10), dec!(15)),
            holding("fund", dec!(3), dec!(10), dec!(10)),
            holding("bond", dec!(1), dec!(100), dec!(100)),
        ];
        let summary = summarize(&assets).unwrap();
        let types: Vec<&str> = summary
            .asset_allocation
            .iter()
            .map(|entry| entry.asset_type.as_str())
            .collect();

        assert_eq!(types, ["fund", "equity", "bond"]);
        assert_eq!(summary.asset_allocation[0].value, dec!(40));
        assert_eq!(summary.asset_allocation[1].value, dec!(30));
        assert_eq!(summary.asset_allocation[2].value, dec!(100));
    }

    #[test]
    fn totals_beyond_decimal_range_are_an_error() {
        let big = dec!(50000000000000000000000000000);
        let assets = vec![
            holding("equity", big, dec!(1), dec!(1)),
            holding("equity", big, dec!(1), dec!(1)),
        ];
        assert!(matches!(summarize(&assets), Err(AnalyticsError::Overflow(_))));
    }
}

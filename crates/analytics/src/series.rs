use crate::error::AnalyticsError;
use crate::report::{AssetPerformance, PerformancePoint, PortfolioPerformance};
use crate::util::{change_percent, checked_add};
use chrono::NaiveDate;
use core_types::{Asset, PriceSnapshot};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Builds normalized performance series over `[start, end]`.
///
/// Each asset's series is expressed as the percent change from its first
/// snapshot inside the range. Assets without snapshots in the range are left
/// out. The portfolio series sums, per calendar date, the values of every
/// snapshot that falls on that date; an asset with no snapshot on a date simply
/// does not contribute to it.
pub fn build_performance(
    assets: &[Asset],
    snapshots_by_asset: &HashMap<i64, Vec<PriceSnapshot>>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PortfolioPerformance, AnalyticsError> {
    if start > end {
        return Err(AnalyticsError::InvalidRange { start, end });
    }

    let mut totals_by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    let mut assets_performance = Vec::new();

    for asset in assets {
        let history = snapshots_by_asset
            .get(&asset.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let selected = select_in_range(history, start, end);
        if selected.is_empty() {
            continue;
        }

        for snapshot in &selected {
            let total = totals_by_date.entry(snapshot.date).or_default();
            *total = checked_add(*total, snapshot.value, "total_performance")?;
        }

        let points = normalize(selected.iter().map(|s| (s.date, s.value)))?;
        assets_performance.push(AssetPerformance {
            id: asset.id,
            name: asset.name.clone(),
            ticker: asset.ticker.clone(),
            asset_type: asset.asset_type.clone(),
            performance: points,
        });
    }

    tracing::debug!(
        assets = assets_performance.len(),
        dates = totals_by_date.len(),
        %start,
        %end,
        "Built performance series."
    );

    Ok(PortfolioPerformance {
        total_performance: normalize(totals_by_date.into_iter())?,
        assets_performance,
    })
}

/// Snapshots dated within `[start, end]`, ascending by date.
///
/// The sort is stable, so same-day snapshots keep their recorded order.
fn select_in_range(history: &[PriceSnapshot], start: NaiveDate, end: NaiveDate) -> Vec<&PriceSnapshot> {
    let mut selected: Vec<&PriceSnapshot> = history
        .iter()
        .filter(|s| s.date >= start && s.date <= end)
        .collect();
    selected.sort_by_key(|s| s.date);
    selected
}

/// Turns an ordered `(date, value)` sequence into points relative to the first value.
fn normalize(
    values: impl Iterator<Item = (NaiveDate, Decimal)>,
) -> Result<Vec<PerformancePoint>, AnalyticsError> {
    let mut base = None;
    values
        .map(|(date, value)| -> Result<PerformancePoint, AnalyticsError> {
            let base = *base.get_or_insert(value);
            Ok(PerformancePoint {
                date,
                value,
                change_percent: change_percent(value, base)?,
            })
        })
        .collect()
}

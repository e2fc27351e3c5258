use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio-wide totals returned alongside the asset list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_gain_loss: Decimal,
    /// Gain/loss as a percent of cost; 0 for a zero-cost portfolio.
    pub total_performance: Decimal,
    /// One entry per asset type, in the order the type was first seen.
    pub asset_allocation: Vec<AllocationEntry>,
}

impl Summary {
    /// The summary of an empty portfolio.
    pub fn empty() -> Self {
        Self {
            total_value: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            total_gain_loss: Decimal::ZERO,
            total_performance: Decimal::ZERO,
            asset_allocation: Vec::new(),
        }
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub value: Decimal,
}

/// A single point of a normalized performance series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub value: Decimal,
    /// Percent change from the first point of the series.
    pub change_percent: Decimal,
}

/// The performance series of a single asset, tagged with its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPerformance {
    pub id: i64,
    pub name: String,
    pub ticker: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub performance: Vec<PerformancePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPerformance {
    pub total_performance: Vec<PerformancePoint>,
    pub assets_performance: Vec<AssetPerformance>,
}

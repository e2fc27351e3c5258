use crate::error::EngineError;
use analytics::{build_performance, revalue, summarize, PortfolioPerformance, Summary};
use chrono::{Local, NaiveDate, Utc};
use core_types::{Asset, AssetUpdate, NewAsset, NewPriceSnapshot, PriceSnapshot};
use database::{repository, DbError, DbRepository};
use quote_client::QuoteSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A window over the asset list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

/// The body of `GET /assets`: one page of holdings plus the portfolio summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetList {
    pub assets: Vec<Asset>,
    /// Computed over every asset, not only the returned page.
    pub summary: Summary,
}

/// The local calendar date snapshots are filed under.
///
/// Prices follow the exchange's trading day, so the date is taken in local
/// time while `last_updated` stays in UTC.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The central service for portfolio operations.
#[derive(Clone)]
pub struct PortfolioService {
    pub(crate) repo: DbRepository,
    pub(crate) quotes: Arc<dyn QuoteSource>,
}

impl PortfolioService {
    pub fn new(repo: DbRepository, quotes: Arc<dyn QuoteSource>) -> Self {
        Self { repo, quotes }
    }

    pub async fn list_assets(&self, page: Page) -> Result<AssetList, EngineError> {
        let mut tx = self.repo.begin().await?;
        let assets =
            repository::list_assets(&mut tx, i64::from(page.skip), i64::from(page.limit)).await?;
        let summary = summarize(&repository::all_assets(&mut tx).await?)?;
        tx.commit().await.map_err(DbError::from)?;
        Ok(AssetList { assets, summary })
    }

    pub async fn summary(&self) -> Result<Summary, EngineError> {
        let mut tx = self.repo.begin().await?;
        let assets = repository::all_assets(&mut tx).await?;
        tx.commit().await.map_err(DbError::from)?;
        Ok(summarize(&assets)?)
    }

    pub async fn get_asset(&self, id: i64) -> Result<Asset, EngineError> {
        let mut tx = self.repo.begin().await?;
        let asset = repository::find_asset(&mut tx, id)
            .await?
            .ok_or(EngineError::NotFound(id))?;
        tx.commit().await.map_err(DbError::from)?;
        Ok(asset)
    }

    /// The full price history of an asset, oldest first.
    pub async fn price_history(&self, id: i64) -> Result<Vec<PriceSnapshot>, EngineError> {
        let mut tx = self.repo.begin().await?;
        if repository::find_asset(&mut tx, id).await?.is_none() {
            return Err(EngineError::NotFound(id));
        }
        let history = repository::snapshots_for_asset(&mut tx, id).await?;
        tx.commit().await.map_err(DbError::from)?;
        Ok(history)
    }

    /// Records a new holding, valued at its purchase price, and its first snapshot.
    pub async fn create_asset(&self, new: NewAsset) -> Result<Asset, EngineError> {
        new.validate()?;
        let now = Utc::now();
        let pending = Asset::pending(new, now)?;
        let price = pending.current_price;
        let valued = revalue(pending, price)?;

        let mut tx = self.repo.begin().await?;
        let asset = repository::insert_asset(&mut tx, &valued).await?;
        repository::insert_snapshot(&mut tx, &NewPriceSnapshot::of(&asset, today()))
            .await?;
        tx.commit().await.map_err(DbError::from)?;

        tracing::info!(asset_id = asset.id, ticker = %asset.ticker, "Asset created.");
        Ok(asset)
    }

    /// Applies a partial update and revalues the asset.
    ///
    /// An update that supplies `current_price` is a price change and appends a
    /// snapshot, like a refresh does.
    pub async fn update_asset(&self, id: i64, update: AssetUpdate) -> Result<Asset, EngineError> {
        let mut tx = self.repo.begin().await?;
        let mut asset = repository::find_asset(&mut tx, id)
            .await?
            .ok_or(EngineError::NotFound(id))?;

        update.merge(&mut asset);
        asset.validate()?;
        let price = asset.current_price;
        let mut asset = revalue(asset, price)?;
        let now = Utc::now();
        asset.last_updated = now;

        repository::update_asset(&mut tx, &asset).await?;
        if update.changes_price() {
            repository::insert_snapshot(&mut tx, &NewPriceSnapshot::of(&asset, today()))
                .await?;
        }
        tx.commit().await.map_err(DbError::from)?;

        tracing::info!(asset_id = id, "Asset updated.");
        Ok(asset)
    }

    /// Deletes an asset and its price history, returning the deleted record.
    pub async fn delete_asset(&self, id: i64) -> Result<Asset, EngineError> {
        let mut tx = self.repo.begin().await?;
        let asset = repository::find_asset(&mut tx, id)
            .await?
            .ok_or(EngineError::NotFound(id))?;
        repository::delete_asset(&mut tx, id).await?;
        tx.commit().await.map_err(DbError::from)?;

        tracing::info!(asset_id = id, ticker = %asset.ticker, "Asset deleted.");
        Ok(asset)
    }

    pub async fn performance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PortfolioPerformance, EngineError> {
        let mut tx = self.repo.begin().await?;
        let assets = repository::all_assets(&mut tx).await?;
        let history = repository::snapshots_between(&mut tx, start, end).await?;
        tx.commit().await.map_err(DbError::from)?;

        Ok(build_performance(&assets, &history, start, end)?)
    }
}
